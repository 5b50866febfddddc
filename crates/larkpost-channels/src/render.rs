//! Render-mode resolution — plain text message or markdown card.
//!
//! `card` and `raw` are explicit overrides. In `auto` the text is sniffed
//! for content that a plain Feishu text message would mangle:
//! - fenced code blocks (```` ``` ... ``` ````, may span lines)
//! - table rows (`| a | b |`)
//!
//! The sniffing is a heuristic: prose with three pipes on one line also
//! selects a card.

use std::sync::OnceLock;

use larkpost_core::config::{FeishuConfig, RenderMode};
use regex::Regex;

fn code_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```.*?```").unwrap())
}

fn table_row_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\|.+\|.+\|").unwrap())
}

/// Whether `text` contains a fenced code block or a table-like line.
pub fn has_rich_content(text: &str) -> bool {
    code_fence_re().is_match(text) || table_row_re().is_match(text)
}

/// Decide whether `text` should go out as a card under `config`.
pub fn resolve_render_mode(config: &FeishuConfig, text: &str) -> bool {
    match config.render_mode {
        RenderMode::Card => true,
        RenderMode::Raw => false,
        RenderMode::Auto => has_rich_content(text),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
