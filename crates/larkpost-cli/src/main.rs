//! Larkpost CLI — entry point.
//!
//! # Commands
//!
//! - `larkpost status` — show config path, render mode, and delivery descriptor
//! - `larkpost init` — write a default config file
//! - `larkpost resolve [TEXT]` — show whether text would go out as card or plain
//! - `larkpost chunk [TEXT]` — show how text would be split for delivery
//! - `larkpost send --to TARGET [--text ..] [--media ..]` — dry-run a delivery

mod dry_run;
mod helpers;
mod preview;
mod send_cmd;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use larkpost_core::config::{load_config, Config, RenderMode};
use larkpost_core::utils::expand_home;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Larkpost — Feishu outbound delivery preview
#[derive(Parser)]
#[command(name = "larkpost", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.larkpost/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the configured render mode (auto, card, raw)
    #[arg(long, global = true)]
    render_mode: Option<RenderMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration and delivery descriptor
    Status,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show the render decision for a text ("-" or omitted reads stdin)
    Resolve { text: Option<String> },

    /// Show the chunk plan for a text ("-" or omitted reads stdin)
    Chunk {
        text: Option<String>,

        /// Override the configured chunk limit
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Dry-run a delivery and print every send call
    Send {
        /// Destination (e.g. "chat:oc_xxx", "user:ou_xxx")
        #[arg(short, long)]
        to: String,

        /// Text to send (announce text when --media is given)
        #[arg(long)]
        text: Option<String>,

        /// Media URL or path to attach
        #[arg(short, long)]
        media: Option<String>,

        /// Simulate a media upload failure to preview the link fallback
        #[arg(long, default_value_t = false)]
        fail_media: bool,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(expand_home);

    match cli.command {
        Commands::Status => {
            init_logging(false);
            let config = build_config(config_path.clone(), cli.render_mode);
            status::run(&config, config_path)
        }
        Commands::Init { force } => status::init(config_path, force),
        Commands::Resolve { text } => {
            init_logging(false);
            let config = build_config(config_path, cli.render_mode);
            preview::resolve(&config, helpers::text_or_stdin(text)?)
        }
        Commands::Chunk { text, limit } => {
            init_logging(false);
            let mut config = build_config(config_path, cli.render_mode);
            if let Some(limit) = limit {
                config.channels.feishu.text_chunk_limit = limit;
            }
            preview::chunk(&config, helpers::text_or_stdin(text)?)
        }
        Commands::Send {
            to,
            text,
            media,
            fail_media,
            json,
            logs,
        } => {
            init_logging(logs);
            let config = build_config(config_path, cli.render_mode);
            send_cmd::run(&config, &to, text, media, fail_media, json).await
        }
    }
}

/// Load config and apply command-line overrides.
fn build_config(path: Option<PathBuf>, render_mode: Option<RenderMode>) -> Config {
    let mut config = load_config(path.as_deref());
    if let Some(mode) = render_mode {
        config.channels.feishu.render_mode = mode;
    }
    config
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("larkpost=debug,larkpost_channels=debug,larkpost_core=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
