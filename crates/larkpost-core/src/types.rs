//! Outbound request, receipt, and result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Channel tag stamped on every result this adapter returns.
pub const FEISHU_CHANNEL: &str = "feishu";

// ─────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────

/// A single outbound delivery request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendRequest {
    /// Destination as supplied by the host (e.g. `"chat:oc_123"`).
    pub to: String,
    /// Text to deliver. May be empty or whitespace-only.
    pub text: Option<String>,
    /// Media URI or local path to attach.
    pub media_url: Option<String>,
}

impl SendRequest {
    /// Create a text-only request.
    pub fn text(to: impl Into<String>, text: impl Into<String>) -> Self {
        SendRequest {
            to: to.into(),
            text: Some(text.into()),
            media_url: None,
        }
    }

    /// Attach a media reference.
    pub fn with_media(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = Some(media_url.into());
        self
    }
}

// ─────────────────────────────────────────────
// Results
// ─────────────────────────────────────────────

/// What a sender hands back after a successful API call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub chat_id: String,
}

impl DeliveryReceipt {
    pub fn new(message_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        DeliveryReceipt {
            message_id: message_id.into(),
            chat_id: chat_id.into(),
        }
    }
}

/// Result returned to the host: the channel tag plus the sender's receipt.
///
/// Serializes flat, e.g. `{"channel":"feishu","messageId":"om_1","chatId":"oc_1"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub channel: String,
    #[serde(flatten)]
    pub receipt: DeliveryReceipt,
}

impl SendResult {
    /// Tag a receipt as delivered through the Feishu channel.
    pub fn feishu(receipt: DeliveryReceipt) -> Self {
        SendResult {
            channel: FEISHU_CHANNEL.to_string(),
            receipt,
        }
    }
}

// ─────────────────────────────────────────────
// Destinations
// ─────────────────────────────────────────────

/// Which kind of id a `ReceiveTarget` carries (Feishu's `receive_id_type`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveIdType {
    ChatId,
    OpenId,
    UserId,
}

impl ReceiveIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiveIdType::ChatId => "chat_id",
            ReceiveIdType::OpenId => "open_id",
            ReceiveIdType::UserId => "user_id",
        }
    }
}

/// A parsed destination.
///
/// Accepted forms:
/// - optional `feishu:` / `lark:` channel prefix
/// - `chat:<id>` / `group:<id>` — group chat
/// - `user:<id>` / `dm:<id>` — a user (`ou_` ids are open ids)
/// - bare ids: `oc_` → chat, `ou_` → open id, anything else → user id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiveTarget {
    pub id: String,
    pub id_type: ReceiveIdType,
}

impl ReceiveTarget {
    pub fn parse(raw: &str) -> Result<Self, DeliveryError> {
        let mut rest = raw.trim();
        for prefix in ["feishu:", "lark:"] {
            if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
                rest = stripped.trim();
                break;
            }
        }

        let (forced, id) = if let Some(id) = strip_prefix_ignore_case(rest, "chat:")
            .or_else(|| strip_prefix_ignore_case(rest, "group:"))
        {
            (Some(ReceiveIdType::ChatId), id.trim())
        } else if let Some(id) = strip_prefix_ignore_case(rest, "user:")
            .or_else(|| strip_prefix_ignore_case(rest, "dm:"))
        {
            let id = id.trim();
            let id_type = if id.starts_with("ou_") {
                ReceiveIdType::OpenId
            } else {
                ReceiveIdType::UserId
            };
            (Some(id_type), id)
        } else {
            (None, rest)
        };

        if id.is_empty() {
            return Err(DeliveryError::invalid_target(format!(
                "no receive id in '{raw}'"
            )));
        }

        let id_type = forced.unwrap_or_else(|| {
            if id.starts_with("oc_") {
                ReceiveIdType::ChatId
            } else if id.starts_with("ou_") {
                ReceiveIdType::OpenId
            } else {
                ReceiveIdType::UserId
            }
        });

        Ok(ReceiveTarget {
            id: id.to_string(),
            id_type,
        })
    }
}

impl fmt::Display for ReceiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id_type.as_str(), self.id)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&s[prefix.len()..]),
        _ => None,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
