//! `larkpost send` — dry-run a delivery through the real adapter logic.
//!
//! Text-only sends are chunked first, the way a host runtime would; each
//! chunk is delivered on its own. Sends with media go through a single
//! `deliver` call.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use larkpost_channels::FeishuOutbound;
use larkpost_core::config::Config;
use larkpost_core::types::{SendRequest, SendResult};

use crate::dry_run::DryRunSender;
use crate::helpers::print_result;

/// Run a dry-run delivery and print the result.
pub async fn run(
    config: &Config,
    to: &str,
    text: Option<String>,
    media: Option<String>,
    fail_media: bool,
    json: bool,
) -> Result<()> {
    let sender = Arc::new(DryRunSender::new(fail_media));
    let outbound = FeishuOutbound::with_sender(sender.clone());
    let request = SendRequest {
        to: to.to_string(),
        text,
        media_url: media,
    };

    let results = deliver_chunked(&outbound, config, &request)
        .await
        .with_context(|| format!("delivery to '{to}' failed"))?;
    debug!(receipts = sender.sent(), "dry run complete");

    for result in &results {
        print_result(result, json)?;
    }
    Ok(())
}

async fn deliver_chunked(
    outbound: &FeishuOutbound,
    config: &Config,
    request: &SendRequest,
) -> Result<Vec<SendResult>> {
    if request.media_url.as_deref().filter(|u| !u.is_empty()).is_some() {
        return Ok(vec![outbound.deliver(config, request).await?]);
    }

    let text = request.text.as_deref().unwrap_or("");
    let chunks = FeishuOutbound::descriptor(config).chunk(text);
    debug!(to = %request.to, chunks = chunks.len(), "delivering text in chunks");

    let mut results = Vec::new();
    for chunk in chunks {
        results.push(outbound.deliver_text(config, &request.to, &chunk).await?);
    }
    Ok(results)
}
