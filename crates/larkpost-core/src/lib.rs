//! Larkpost Core — shared types, configuration, and the delivery error taxonomy.
//!
//! This crate provides:
//! - **config**: JSON configuration schema, loader, and env var overrides
//! - **error**: `DeliveryError`, the failure type every sender returns
//! - **types**: send requests, receipts, results, and destination parsing
//! - **utils**: data directory and path helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::DeliveryError;
pub use types::{DeliveryReceipt, ReceiveIdType, ReceiveTarget, SendRequest, SendResult};
