//! Dry-run sender — prints what would be sent instead of calling Feishu.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use colored::Colorize;

use larkpost_channels::{CardSender, MediaSender, TextSender};
use larkpost_core::config::Config;
use larkpost_core::error::DeliveryError;
use larkpost_core::types::{DeliveryReceipt, ReceiveTarget};

/// Implements every send call by printing it to stdout.
///
/// `fail_media` makes every media send fail so the link fallback can be
/// previewed.
pub struct DryRunSender {
    fail_media: bool,
    sent: AtomicUsize,
}

impl DryRunSender {
    pub fn new(fail_media: bool) -> Self {
        Self {
            fail_media,
            sent: AtomicUsize::new(0),
        }
    }

    /// Number of calls that produced a receipt.
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    fn receipt(&self, target: &ReceiveTarget) -> DeliveryReceipt {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        let stamp = chrono::Utc::now().timestamp_millis();
        DeliveryReceipt::new(format!("dry_{stamp}_{n}"), target.id.clone())
    }
}

fn print_call(kind: &str, target: &ReceiveTarget, body: &str) {
    println!(
        "{} {} {}",
        format!("→ {kind:<5}").cyan().bold(),
        target.to_string().dimmed(),
        body
    );
}

#[async_trait]
impl TextSender for DryRunSender {
    async fn send_text(
        &self,
        _config: &Config,
        target: &ReceiveTarget,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        print_call("text", target, text);
        Ok(self.receipt(target))
    }
}

#[async_trait]
impl CardSender for DryRunSender {
    async fn send_card(
        &self,
        _config: &Config,
        target: &ReceiveTarget,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        print_call("card", target, text);
        Ok(self.receipt(target))
    }
}

#[async_trait]
impl MediaSender for DryRunSender {
    async fn send_media(
        &self,
        _config: &Config,
        target: &ReceiveTarget,
        media_url: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        print_call("media", target, media_url);
        if self.fail_media {
            println!("{}", "  ✗ simulated upload failure".red());
            return Err(DeliveryError::upload("simulated failure (--fail-media)"));
        }
        Ok(self.receipt(target))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use larkpost_channels::FeishuOutbound;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dry_run_text() {
        let sender = Arc::new(DryRunSender::new(false));
        let outbound = FeishuOutbound::with_sender(sender.clone());

        let result = outbound
            .deliver_text(&Config::default(), "chat:oc_1", "hello")
            .await
            .unwrap();

        assert_eq!(result.channel, "feishu");
        assert_eq!(result.receipt.chat_id, "oc_1");
        assert!(result.receipt.message_id.starts_with("dry_"));
        assert_eq!(sender.sent(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_media_failure_previews_fallback() {
        let sender = Arc::new(DryRunSender::new(true));
        let outbound = FeishuOutbound::with_sender(sender.clone());

        let result = outbound
            .deliver_media(
                &Config::default(),
                "ou_1",
                Some("report"),
                Some("https://example.com/a.png"),
            )
            .await
            .unwrap();

        // announce + fallback link; the failed upload produced no receipt
        assert_eq!(sender.sent(), 2);
        assert!(result.receipt.message_id.ends_with("_2"));
    }
}
