//! Config loader — reads `~/.larkpost/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.larkpost/config.json`
//! 3. Environment variables `LARKPOST_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, RenderMode};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `LARKPOST_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `LARKPOST_CHANNELS__FEISHU__RENDER_MODE` → `channels.feishu.render_mode`
/// - `LARKPOST_CHANNELS__FEISHU__TEXT_CHUNK_LIMIT` → `channels.feishu.text_chunk_limit`
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using `lookup` to resolve variable names.
fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(val) = lookup("LARKPOST_CHANNELS__FEISHU__RENDER_MODE") {
        match val.parse::<RenderMode>() {
            Ok(mode) => config.channels.feishu.render_mode = mode,
            Err(e) => warn!("Ignoring LARKPOST_CHANNELS__FEISHU__RENDER_MODE: {}", e),
        }
    }
    if let Some(val) = lookup("LARKPOST_CHANNELS__FEISHU__TEXT_CHUNK_LIMIT") {
        match val.parse::<usize>() {
            Ok(n) => config.channels.feishu.text_chunk_limit = n,
            Err(e) => warn!("Ignoring LARKPOST_CHANNELS__FEISHU__TEXT_CHUNK_LIMIT: {}", e),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
