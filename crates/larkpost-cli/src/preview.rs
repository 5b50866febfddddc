//! `larkpost resolve` / `larkpost chunk` — inspect render and chunk decisions.

use anyhow::Result;
use colored::Colorize;

use larkpost_channels::{has_rich_content, resolve_render_mode, FeishuOutbound};
use larkpost_core::config::{Config, RenderMode};
use larkpost_core::utils::one_line_preview;

/// Why a render decision was made, for display.
fn reason(mode: RenderMode, text: &str) -> &'static str {
    match mode {
        RenderMode::Card => "renderMode=card",
        RenderMode::Raw => "renderMode=raw",
        RenderMode::Auto if has_rich_content(text) => "auto: code block or table found",
        RenderMode::Auto => "auto: no rich content",
    }
}

/// Print whether `text` would be sent as a card or plain text.
pub fn resolve(config: &Config, text: String) -> Result<()> {
    let feishu = &config.channels.feishu;
    let decision = if resolve_render_mode(feishu, &text) {
        "card".magenta().bold()
    } else {
        "plain".green().bold()
    };

    println!("{} {}", decision, format!("({})", reason(feishu.render_mode, &text)).dimmed());
    Ok(())
}

/// Print the chunk plan for `text`.
pub fn chunk(config: &Config, text: String) -> Result<()> {
    let descriptor = FeishuOutbound::descriptor(config);
    let chunks = descriptor.chunk(&text);

    println!(
        "{} chunk(s), limit {}",
        chunks.len().to_string().bold(),
        descriptor.text_chunk_limit
    );
    for (i, chunk) in chunks.iter().enumerate() {
        let preview = one_line_preview(chunk, 60);
        println!(
            "  {:>3}  {:>6} chars  {}",
            i + 1,
            chunk.chars().count(),
            preview.dimmed()
        );
    }
    Ok(())
}
