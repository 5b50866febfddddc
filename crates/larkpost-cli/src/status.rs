//! `larkpost status` / `larkpost init` — configuration overview and setup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use larkpost_channels::outbound::MEDIA_FALLBACK_MARKER;
use larkpost_channels::FeishuOutbound;
use larkpost_core::config::{get_config_path, save_config, Config};

/// Run the status command.
pub fn run(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let config_path = path.unwrap_or_else(get_config_path);
    let feishu = &config.channels.feishu;

    println!();
    println!("{}", "Larkpost Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    println!("  {:<18} {}", "Render mode:".bold(), feishu.render_mode);
    println!("  {:<18} {}", "Chunk limit:".bold(), feishu.text_chunk_limit);

    println!();
    println!("  {}", "Delivery:".bold());
    let descriptor = FeishuOutbound::descriptor(config);
    println!("    {:<20} {}", "mode", descriptor.delivery_mode.as_str().dimmed());
    println!("    {:<20} {}", "chunker", descriptor.chunker_mode.as_str().dimmed());
    println!(
        "    {:<20} {}",
        "media fallback",
        format!("{MEDIA_FALLBACK_MARKER} <url> as plain text").dimmed()
    );
    println!();

    Ok(())
}

/// Write a default config file.
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        println!(
            "  {} config already exists at {} (use --force to overwrite)",
            "✓".green(),
            config_path.display()
        );
        return Ok(());
    }

    save_config(&Config::default(), Some(&config_path))
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    println!(
        "  {} created config at {}",
        "✓".green(),
        config_path.display()
    );
    Ok(())
}
