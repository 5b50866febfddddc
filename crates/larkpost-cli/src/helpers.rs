//! Shared CLI helpers — input reading and result printing.

use std::io::Read;

use anyhow::{Context, Result};
use colored::Colorize;

use larkpost_core::types::SendResult;

/// Use `text` if given, otherwise read all of stdin.
pub fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(t) if t != "-" => Ok(t),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            Ok(buf)
        }
    }
}

/// Print a delivery result, either as JSON or as a short summary.
pub fn print_result(result: &SendResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!();
        println!(
            "{} {} {}",
            "✓ delivered".green().bold(),
            format!("[{}]", result.channel).dimmed(),
            result.receipt.message_id
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
