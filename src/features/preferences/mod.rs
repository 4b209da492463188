//! # Feature: Preferences
//!
//! Per-user nicknames, greeting/silent flags, model choice and memos, backed by
//! the durable JSON document.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Memory export for /memory_read
//! - 1.0.0: Initial release with nickname, greeting, silent, model and memo storage

pub mod repository;

pub use repository::{
    ExportScope, MemoryExport, PreferenceError, PreferenceField, PreferenceRepository,
    PreferenceSnapshot, DEFAULT_MODEL, SUPPORTED_MODELS,
};
