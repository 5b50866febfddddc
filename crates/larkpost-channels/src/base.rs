//! Sender traits — the capabilities the host injects into the adapter.
//!
//! Each trait wraps one Feishu API call:
//! - `send_text()` — plain `text` message
//! - `send_card()` — interactive card rendering the text as markdown
//! - `send_media()` — upload a media reference and post it
//!
//! Implementations own the transport and credentials; the adapter only
//! decides which one to call and what to do when it fails.

use async_trait::async_trait;
use larkpost_core::config::Config;
use larkpost_core::error::DeliveryError;
use larkpost_core::types::{DeliveryReceipt, ReceiveTarget};

/// Delivers plain text.
#[async_trait]
pub trait TextSender: Send + Sync {
    async fn send_text(
        &self,
        config: &Config,
        target: &ReceiveTarget,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Delivers text rendered as a markdown card.
#[async_trait]
pub trait CardSender: Send + Sync {
    async fn send_card(
        &self,
        config: &Config,
        target: &ReceiveTarget,
        text: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Uploads and delivers a media reference (URL or local path).
#[async_trait]
pub trait MediaSender: Send + Sync {
    async fn send_media(
        &self,
        config: &Config,
        target: &ReceiveTarget,
        media_url: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}
