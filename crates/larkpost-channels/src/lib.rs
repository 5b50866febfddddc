//! Larkpost Channels — Feishu outbound delivery.
//!
//! This crate provides:
//! - **base**: the injected sender traits (`TextSender`, `CardSender`, `MediaSender`)
//! - **render**: render-mode resolution (plain text vs. markdown card)
//! - **formatting**: markdown-aware text chunking for the host
//! - **outbound**: `FeishuOutbound` — the delivery descriptor and send/fallback logic

pub mod base;
pub mod formatting;
pub mod outbound;
pub mod render;

pub use base::{CardSender, MediaSender, TextSender};
pub use outbound::{FeishuOutbound, OutboundDescriptor};
pub use render::{has_rich_content, resolve_render_mode};
