//! # Feature: Chat
//!
//! Free-text conversation in channels where chat is switched on: canned
//! keyword replies, occasional filler lines, otherwise a Gemini completion
//! grounded in the user's memos.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: true (per channel via /chat)
//!
//! ## Changelog
//! - 1.1.0: Per-user model selection, memos fed into the system instruction
//! - 1.0.0: Keyword table, filler lines and Gemini fallback

pub mod gemini;
pub mod responder;
pub mod switch;

pub use gemini::{GeminiClient, BLOCKED_REPLY, FAILURE_REPLY, MISSING_KEY_REPLY};
pub use responder::{canned_reply, pick_filler, ChatResponder, FILLER_PROBABILITY, NAME_REPLY};
pub use switch::ChatSwitch;
