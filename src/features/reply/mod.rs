//! # Feature: Reply Composition
//!
//! Deterministic greeting and silent-mode modifiers for chat replies.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod composer;

pub use composer::{compose_for_user, compose_reply, SILENT_MARKER, SILENT_PREFIX};
