//! Delivery error taxonomy.

use thiserror::Error;

/// An outbound send or upload failed.
///
/// Returned by every injected sender and propagated unchanged by the
/// delivery adapter, except for media failures that are absorbed by the
/// plain-text link fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The provider API answered with a non-zero error code.
    #[error("feishu api error {code}: {message}")]
    Api { code: i64, message: String },

    /// The request never got a usable response (connect, timeout, decode).
    #[error("transport error: {0}")]
    Transport(String),

    /// Media could not be fetched or uploaded.
    #[error("media upload failed: {0}")]
    Upload(String),

    /// The destination could not be resolved to a receive id.
    #[error("invalid destination: {0}")]
    InvalidTarget(String),
}

impl DeliveryError {
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        DeliveryError::Api {
            code,
            message: message.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        DeliveryError::Transport(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        DeliveryError::Upload(msg.into())
    }

    pub fn invalid_target(msg: impl Into<String>) -> Self {
        DeliveryError::InvalidTarget(msg.into())
    }
}
