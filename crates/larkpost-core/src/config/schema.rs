//! Configuration schema.
//!
//! Hierarchy: `Config` → `ChannelsConfig` → `FeishuConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default maximum size of a single outbound text chunk.
pub const DEFAULT_TEXT_CHUNK_LIMIT: usize = 4000;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.larkpost/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub channels: ChannelsConfig,
}

// ─────────────────────────────────────────────
// Channels
// ─────────────────────────────────────────────

/// All channel configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub feishu: FeishuConfig,
}

/// Feishu/Lark outbound settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeishuConfig {
    /// How outbound text is rendered: `"auto"` (default), `"card"`, or `"raw"`.
    #[serde(default)]
    pub render_mode: RenderMode,
    /// Maximum characters per outbound chunk handed to the host chunker.
    #[serde(default = "default_text_chunk_limit")]
    pub text_chunk_limit: usize,
}

fn default_text_chunk_limit() -> usize {
    DEFAULT_TEXT_CHUNK_LIMIT
}

impl Default for FeishuConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            text_chunk_limit: default_text_chunk_limit(),
        }
    }
}

// ─────────────────────────────────────────────
// Render mode
// ─────────────────────────────────────────────

/// Per-channel rendering policy for outbound text.
///
/// - `Auto` — sniff the text; code fences or tables go out as a card
/// - `Card` — always send an interactive markdown card
/// - `Raw` — always send a plain text message
///
/// Any unrecognised value in the config file deserializes as `Auto`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Card,
    Raw,
    #[default]
    #[serde(other)]
    Auto,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Auto => "auto",
            RenderMode::Card => "card",
            RenderMode::Raw => "raw",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RenderMode::Auto),
            "card" => Ok(RenderMode::Card),
            "raw" => Ok(RenderMode::Raw),
            other => Err(format!(
                "unknown render mode '{other}' (expected auto, card, or raw)"
            )),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
