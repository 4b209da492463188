//! # Core Module
//!
//! Configuration and Discord message helpers shared by every feature.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: JSON reply helper for /memory_read
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod response;

pub use config::Config;
pub use response::{json_reply, truncate_for_message, JsonReply, EMBED_LIMIT, INLINE_JSON_LIMIT, MESSAGE_LIMIT};
