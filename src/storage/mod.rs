//! # Storage
//!
//! Durable persistence of the preference document as a single JSON file.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod document;
pub mod durable;

pub use document::{MemoBook, PreferenceDocument};
pub use durable::{DurableStore, StorageError};
