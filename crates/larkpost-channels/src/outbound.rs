//! Feishu outbound adapter — delivery descriptor and send/fallback logic.
//!
//! `FeishuOutbound` wraps three injected senders and decides, per request:
//! - whether text goes out as a plain message or a markdown card
//!   (see [`crate::render`])
//! - in which order announce text and media are sent
//! - what happens when the media upload fails
//!
//! # Media delivery
//!
//! ```text
//! START ─► text non-blank? ─yes─► send text (card or plain) ─┐
//!            │no                                             │
//!            ▼                                               ▼
//!        media ref? ─yes─► send media ─ok──────────────────► DONE
//!            │no              │err
//!            │                └─► log, send "📎 <ref>" as text ► DONE
//!            ▼
//!        text result (or send text/"" as plain) ───────────► DONE
//! ```
//!
//! Requests are processed strictly in order; the adapter holds no mutable
//! state and can be shared across tasks.

use std::sync::Arc;

use tracing::{debug, error};

use larkpost_core::config::Config;
use larkpost_core::error::DeliveryError;
use larkpost_core::types::{DeliveryReceipt, ReceiveTarget, SendRequest, SendResult};

use crate::base::{CardSender, MediaSender, TextSender};
use crate::formatting::chunk_markdown_text;
use crate::render::resolve_render_mode;

// ─────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────

/// Marker placed before a media reference when the upload fails.
pub const MEDIA_FALLBACK_MARKER: &str = "📎";

// ─────────────────────────────────────────────
// Descriptor
// ─────────────────────────────────────────────

/// How the host should expect messages to be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One send call produces one delivered message; no queued batching.
    Direct,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Direct => "direct",
        }
    }
}

/// Which splitting strategy the host chunker applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkerMode {
    /// Paragraph/line aware, keeps code fences balanced.
    Markdown,
}

impl ChunkerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkerMode::Markdown => "markdown",
        }
    }
}

/// Text chunker signature: `(text, limit) -> chunks`.
pub type Chunker = fn(&str, usize) -> Vec<String>;

/// What the adapter advertises to the host runtime.
#[derive(Clone, Copy, Debug)]
pub struct OutboundDescriptor {
    pub delivery_mode: DeliveryMode,
    pub chunker_mode: ChunkerMode,
    pub text_chunk_limit: usize,
    pub chunker: Chunker,
}

impl OutboundDescriptor {
    /// Split `text` with the descriptor's chunker and limit.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        (self.chunker)(text, self.text_chunk_limit)
    }
}

// ─────────────────────────────────────────────
// FeishuOutbound
// ─────────────────────────────────────────────

/// Outbound delivery for the Feishu channel.
#[derive(Clone)]
pub struct FeishuOutbound {
    text: Arc<dyn TextSender>,
    card: Arc<dyn CardSender>,
    media: Arc<dyn MediaSender>,
}

impl FeishuOutbound {
    /// Create an adapter from three independent senders.
    pub fn new(
        text: Arc<dyn TextSender>,
        card: Arc<dyn CardSender>,
        media: Arc<dyn MediaSender>,
    ) -> Self {
        Self { text, card, media }
    }

    /// Create an adapter from one client that implements every send call.
    pub fn with_sender<S>(sender: Arc<S>) -> Self
    where
        S: TextSender + CardSender + MediaSender + 'static,
    {
        Self {
            text: sender.clone(),
            card: sender.clone(),
            media: sender,
        }
    }

    /// Delivery descriptor for the host, using the configured chunk limit.
    pub fn descriptor(config: &Config) -> OutboundDescriptor {
        OutboundDescriptor {
            delivery_mode: DeliveryMode::Direct,
            chunker_mode: ChunkerMode::Markdown,
            text_chunk_limit: config.channels.feishu.text_chunk_limit,
            chunker: chunk_markdown_text,
        }
    }

    /// Send a text message, as a card or plain text depending on the render mode.
    ///
    /// Sender errors propagate unchanged.
    pub async fn deliver_text(
        &self,
        config: &Config,
        to: &str,
        text: &str,
    ) -> Result<SendResult, DeliveryError> {
        let target = ReceiveTarget::parse(to)?;
        let use_card = resolve_render_mode(&config.channels.feishu, text);
        let receipt = self.send_rendered(config, &target, text, use_card).await?;
        Ok(SendResult::feishu(receipt))
    }

    /// Send optional announce text followed by an optional media reference.
    ///
    /// A failed announce aborts the call before any media is sent. A failed
    /// media send is logged and replaced by a plain-text link to the media;
    /// the link's own failure propagates.
    pub async fn deliver_media(
        &self,
        config: &Config,
        to: &str,
        text: Option<&str>,
        media_url: Option<&str>,
    ) -> Result<SendResult, DeliveryError> {
        let target = ReceiveTarget::parse(to)?;

        let announce = match text.filter(|t| !t.trim().is_empty()) {
            Some(text) => {
                let use_card = resolve_render_mode(&config.channels.feishu, text);
                Some(self.send_rendered(config, &target, text, use_card).await?)
            }
            None => None,
        };

        if let Some(media_url) = media_url.filter(|u| !u.is_empty()) {
            return match self.media.send_media(config, &target, media_url).await {
                Ok(receipt) => {
                    debug!(receive_id = %target, media_url, "feishu media sent");
                    Ok(SendResult::feishu(receipt))
                }
                Err(e) => {
                    error!(
                        receive_id = %target,
                        media_url,
                        error = %e,
                        "feishu media send failed, falling back to link"
                    );
                    let fallback = format!("{MEDIA_FALLBACK_MARKER} {media_url}");
                    let receipt = self.text.send_text(config, &target, &fallback).await?;
                    Ok(SendResult::feishu(receipt))
                }
            };
        }

        if let Some(receipt) = announce {
            return Ok(SendResult::feishu(receipt));
        }

        let receipt = self
            .text
            .send_text(config, &target, text.unwrap_or(""))
            .await?;
        Ok(SendResult::feishu(receipt))
    }

    /// Deliver a `SendRequest`, routing on whether it carries media.
    pub async fn deliver(
        &self,
        config: &Config,
        request: &SendRequest,
    ) -> Result<SendResult, DeliveryError> {
        match request.media_url.as_deref().filter(|u| !u.is_empty()) {
            Some(media_url) => {
                self.deliver_media(config, &request.to, request.text.as_deref(), Some(media_url))
                    .await
            }
            None => {
                self.deliver_text(config, &request.to, request.text.as_deref().unwrap_or(""))
                    .await
            }
        }
    }

    async fn send_rendered(
        &self,
        config: &Config,
        target: &ReceiveTarget,
        text: &str,
        use_card: bool,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        debug!(receive_id = %target, card = use_card, len = text.len(), "feishu text routed");
        if use_card {
            self.card.send_card(config, target, text).await
        } else {
            self.text.send_text(config, target, text).await
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use larkpost_core::config::RenderMode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Text(String),
        Card(String),
        Media(String),
    }

    /// Records every send call; each capability can be told to fail.
    #[derive(Default)]
    struct RecordingSender {
        calls: tokio::sync::Mutex<Vec<Call>>,
        next_id: AtomicUsize,
        fail_text: bool,
        fail_card: bool,
        fail_media: bool,
    }

    impl RecordingSender {
        async fn record(
            &self,
            call: Call,
            fail: bool,
            target: &ReceiveTarget,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.calls.lock().await.push(call);
            if fail {
                return Err(DeliveryError::api(99991663, "rejected"));
            }
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(DeliveryReceipt::new(format!("om_{n}"), target.id.clone()))
        }

        async fn calls(&self) -> Vec<Call> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl TextSender for RecordingSender {
        async fn send_text(
            &self,
            _config: &Config,
            target: &ReceiveTarget,
            text: &str,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.record(Call::Text(text.to_string()), self.fail_text, target)
                .await
        }
    }

    #[async_trait]
    impl CardSender for RecordingSender {
        async fn send_card(
            &self,
            _config: &Config,
            target: &ReceiveTarget,
            text: &str,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.record(Call::Card(text.to_string()), self.fail_card, target)
                .await
        }
    }

    #[async_trait]
    impl MediaSender for RecordingSender {
        async fn send_media(
            &self,
            _config: &Config,
            target: &ReceiveTarget,
            media_url: &str,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            if self.fail_media {
                self.calls.lock().await.push(Call::Media(media_url.to_string()));
                return Err(DeliveryError::upload("download returned 404"));
            }
            self.record(Call::Media(media_url.to_string()), false, target)
                .await
        }
    }

    fn config(mode: RenderMode) -> Config {
        let mut config = Config::default();
        config.channels.feishu.render_mode = mode;
        config
    }

    fn adapter(sender: &Arc<RecordingSender>) -> FeishuOutbound {
        FeishuOutbound::with_sender(sender.clone())
    }

    const TO: &str = "chat:oc_123";
    const MEDIA: &str = "https://example.com/report.pdf";

    // ── deliver_text ──

    #[tokio::test]
    async fn test_plain_text_in_auto_mode() {
        let sender = Arc::new(RecordingSender::default());
        let result = adapter(&sender)
            .deliver_text(&config(RenderMode::Auto), TO, "hello world")
            .await
            .unwrap();

        assert_eq!(result.channel, "feishu");
        assert_eq!(result.receipt, DeliveryReceipt::new("om_1", "oc_123"));
        assert_eq!(sender.calls().await, vec![Call::Text("hello world".into())]);
    }

    #[tokio::test]
    async fn test_code_block_in_auto_mode_uses_card() {
        let sender = Arc::new(RecordingSender::default());
        let result = adapter(&sender)
            .deliver_text(&config(RenderMode::Auto), TO, "```js\ncode\n```")
            .await
            .unwrap();

        assert_eq!(result.channel, "feishu");
        assert_eq!(
            sender.calls().await,
            vec![Call::Card("```js\ncode\n```".into())]
        );
    }

    #[tokio::test]
    async fn test_raw_mode_overrides_table() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_text(&config(RenderMode::Raw), TO, "| a | b |")
            .await
            .unwrap();

        assert_eq!(sender.calls().await, vec![Call::Text("| a | b |".into())]);
    }

    #[tokio::test]
    async fn test_card_mode_overrides_plain_prose() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_text(&config(RenderMode::Card), TO, "hello")
            .await
            .unwrap();

        assert_eq!(sender.calls().await, vec![Call::Card("hello".into())]);
    }

    #[tokio::test]
    async fn test_card_failure_propagates() {
        let sender = Arc::new(RecordingSender {
            fail_card: true,
            ..Default::default()
        });
        let err = adapter(&sender)
            .deliver_text(&config(RenderMode::Card), TO, "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Api { .. }));
        // No silent retry as plain text
        assert_eq!(sender.calls().await, vec![Call::Card("hello".into())]);
    }

    #[tokio::test]
    async fn test_invalid_destination_sends_nothing() {
        let sender = Arc::new(RecordingSender::default());
        let err = adapter(&sender)
            .deliver_text(&Config::default(), "  ", "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::InvalidTarget(_)));
        assert!(sender.calls().await.is_empty());
    }

    // ── deliver_media ──

    #[tokio::test]
    async fn test_blank_text_skips_announce() {
        let sender = Arc::new(RecordingSender::default());
        let result = adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("  "), Some(MEDIA))
            .await
            .unwrap();

        assert_eq!(result.receipt.message_id, "om_1");
        assert_eq!(sender.calls().await, vec![Call::Media(MEDIA.into())]);
    }

    #[tokio::test]
    async fn test_announce_then_media() {
        let sender = Arc::new(RecordingSender::default());
        let result = adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("see attached"), Some(MEDIA))
            .await
            .unwrap();

        // The media receipt is returned, not the announce receipt
        assert_eq!(result.receipt.message_id, "om_2");
        assert_eq!(
            sender.calls().await,
            vec![Call::Text("see attached".into()), Call::Media(MEDIA.into())]
        );
    }

    #[tokio::test]
    async fn test_rich_announce_uses_card() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("| k | v |"), Some(MEDIA))
            .await
            .unwrap();

        assert_eq!(
            sender.calls().await,
            vec![Call::Card("| k | v |".into()), Call::Media(MEDIA.into())]
        );
    }

    #[tokio::test]
    async fn test_media_failure_falls_back_to_link() {
        let sender = Arc::new(RecordingSender {
            fail_media: true,
            ..Default::default()
        });
        let result = adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("see attached"), Some(MEDIA))
            .await
            .unwrap();

        assert_eq!(result.channel, "feishu");
        assert_eq!(result.receipt.message_id, "om_2");
        assert_eq!(
            sender.calls().await,
            vec![
                Call::Text("see attached".into()),
                Call::Media(MEDIA.into()),
                Call::Text(format!("📎 {MEDIA}")),
            ]
        );
    }

    #[tokio::test]
    async fn test_media_fallback_ignores_render_mode() {
        let sender = Arc::new(RecordingSender {
            fail_media: true,
            ..Default::default()
        });
        adapter(&sender)
            .deliver_media(&config(RenderMode::Card), TO, None, Some(MEDIA))
            .await
            .unwrap();

        assert_eq!(
            sender.calls().await,
            vec![Call::Media(MEDIA.into()), Call::Text(format!("📎 {MEDIA}"))]
        );
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates() {
        let sender = Arc::new(RecordingSender {
            fail_media: true,
            fail_text: true,
            ..Default::default()
        });
        let err = adapter(&sender)
            .deliver_media(&Config::default(), TO, None, Some(MEDIA))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Api { .. }));
        assert_eq!(sender.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_announce_failure_aborts_before_media() {
        let sender = Arc::new(RecordingSender {
            fail_text: true,
            ..Default::default()
        });
        let err = adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("see attached"), Some(MEDIA))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Api { .. }));
        assert_eq!(
            sender.calls().await,
            vec![Call::Text("see attached".into())]
        );
    }

    #[tokio::test]
    async fn test_text_without_media_sent_once() {
        let sender = Arc::new(RecordingSender::default());
        let result = adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("just text"), None)
            .await
            .unwrap();

        assert_eq!(result.receipt.message_id, "om_1");
        assert_eq!(sender.calls().await, vec![Call::Text("just text".into())]);
    }

    #[tokio::test]
    async fn test_nothing_to_send_sends_empty_text() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_media(&Config::default(), TO, None, None)
            .await
            .unwrap();

        assert_eq!(sender.calls().await, vec![Call::Text(String::new())]);
    }

    #[tokio::test]
    async fn test_blank_text_without_media_sent_as_plain() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_media(&config(RenderMode::Card), TO, Some(" \n "), None)
            .await
            .unwrap();

        assert_eq!(sender.calls().await, vec![Call::Text(" \n ".into())]);
    }

    #[tokio::test]
    async fn test_empty_media_url_is_absent() {
        let sender = Arc::new(RecordingSender::default());
        adapter(&sender)
            .deliver_media(&Config::default(), TO, Some("hi"), Some(""))
            .await
            .unwrap();

        assert_eq!(sender.calls().await, vec![Call::Text("hi".into())]);
    }

    // ── deliver / descriptor ──

    #[tokio::test]
    async fn test_deliver_routes_on_media() {
        let sender = Arc::new(RecordingSender::default());
        let outbound = adapter(&sender);
        let config = Config::default();

        outbound
            .deliver(&config, &SendRequest::text(TO, "plain"))
            .await
            .unwrap();
        outbound
            .deliver(&config, &SendRequest::text(TO, "").with_media(MEDIA))
            .await
            .unwrap();

        assert_eq!(
            sender.calls().await,
            vec![Call::Text("plain".into()), Call::Media(MEDIA.into())]
        );
    }

    #[test]
    fn test_descriptor() {
        let descriptor = FeishuOutbound::descriptor(&Config::default());

        assert_eq!(descriptor.delivery_mode, DeliveryMode::Direct);
        assert_eq!(descriptor.delivery_mode.as_str(), "direct");
        assert_eq!(descriptor.chunker_mode.as_str(), "markdown");
        assert_eq!(descriptor.text_chunk_limit, 4000);
    }

    #[test]
    fn test_descriptor_chunk_uses_configured_limit() {
        let mut config = Config::default();
        config.channels.feishu.text_chunk_limit = 5;

        let chunks = FeishuOutbound::descriptor(&config).chunk("aaaa bbbb");
        assert_eq!(chunks, vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_outbound_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FeishuOutbound>();
    }
}
