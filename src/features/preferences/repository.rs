//! Typed read/write surface over the preference document
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Reads are served from memory; the file is read once at startup. Every
//! mutation runs under the write lock and saves the full document before the
//! lock is released, so two interleaved commands can never persist out of order.
//! A failed save is logged and the in-memory state stays authoritative.

use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::storage::{DurableStore, PreferenceDocument};

/// Model used when a user never picked one
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Models a user may switch to with /set_model
pub const SUPPORTED_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-1.5-pro"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("memo keyword must not be empty")]
    EmptyKeyword,
    #[error("unsupported model `{0}`")]
    UnsupportedModel(String),
}

/// A user's preferences with every default resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceSnapshot {
    pub nickname: Option<String>,
    pub greeting: bool,
    pub silent: bool,
    pub model: String,
}

/// Single-field preference update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceField {
    Nickname(String),
    Greeting(bool),
    Silent(bool),
    Model(String),
}

/// Who is asking to see stored memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    All,
    User(String),
}

/// Memory disclosure payload for /memory_read
#[derive(Debug, Clone, Serialize)]
pub struct MemoryExport {
    pub scope: &'static str,
    #[serde(flatten)]
    pub document: PreferenceDocument,
}

impl MemoryExport {
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone)]
pub struct PreferenceRepository {
    inner: Arc<Inner>,
}

struct Inner {
    document: RwLock<PreferenceDocument>,
    store: DurableStore,
    default_model: String,
}

impl PreferenceRepository {
    /// Load the document from `store` and wrap it
    pub async fn open(store: DurableStore, default_model: impl Into<String>) -> Self {
        let document = store.load().await;
        info!(
            "Preference repository ready ({} nicknames, {} memo books) from {}",
            document.nicknames.len(),
            document.memos.len(),
            store.path().display()
        );
        Self::with_document(store, document, default_model)
    }

    pub fn with_document(
        store: DurableStore,
        document: PreferenceDocument,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                document: RwLock::new(document),
                store,
                default_model: default_model.into(),
            }),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.inner.default_model
    }

    /// Apply `op` to the document and persist the result as one atomic step
    async fn mutate<T>(&self, op: impl FnOnce(&mut PreferenceDocument) -> T) -> T {
        let mut document = self.inner.document.write().await;
        let result = op(&mut document);
        if let Err(e) = self.inner.store.save(&document).await {
            error!("Failed to persist preferences, keeping in-memory state: {e}");
        }
        result
    }

    pub async fn snapshot(&self, user_id: &str) -> PreferenceSnapshot {
        let document = self.inner.document.read().await;
        PreferenceSnapshot {
            nickname: document.nicknames.get(user_id).cloned(),
            greeting: document.greeting.get(user_id).copied().unwrap_or(false),
            silent: document.silent.get(user_id).copied().unwrap_or(false),
            model: document
                .models
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| self.inner.default_model.clone()),
        }
    }

    pub async fn mutate_preference(
        &self,
        user_id: &str,
        field: PreferenceField,
    ) -> Result<(), PreferenceError> {
        require_user(user_id)?;
        if let PreferenceField::Model(model) = &field {
            if !SUPPORTED_MODELS.contains(&model.as_str()) {
                return Err(PreferenceError::UnsupportedModel(model.clone()));
            }
        }

        debug!("Updating preference for user {user_id}: {field:?}");
        let user = user_id.to_string();
        self.mutate(move |doc| match field {
            PreferenceField::Nickname(name) => {
                doc.nicknames.insert(user, name);
            }
            PreferenceField::Greeting(on) => {
                doc.greeting.insert(user, on);
            }
            PreferenceField::Silent(on) => {
                doc.silent.insert(user, on);
            }
            PreferenceField::Model(model) => {
                doc.models.insert(user, model);
            }
        })
        .await;
        Ok(())
    }

    pub async fn set_nickname(&self, user_id: &str, nickname: &str) -> Result<(), PreferenceError> {
        self.mutate_preference(user_id, PreferenceField::Nickname(nickname.to_string()))
            .await
    }

    pub async fn set_greeting(&self, user_id: &str, on: bool) -> Result<(), PreferenceError> {
        self.mutate_preference(user_id, PreferenceField::Greeting(on))
            .await
    }

    pub async fn set_silent(&self, user_id: &str, on: bool) -> Result<(), PreferenceError> {
        self.mutate_preference(user_id, PreferenceField::Silent(on))
            .await
    }

    pub async fn set_model(&self, user_id: &str, model: &str) -> Result<(), PreferenceError> {
        self.mutate_preference(user_id, PreferenceField::Model(model.to_string()))
            .await
    }

    /// Upsert a memo. Returns `true` when an existing memo was overwritten.
    pub async fn add_memo(
        &self,
        user_id: &str,
        keyword: &str,
        content: &str,
    ) -> Result<bool, PreferenceError> {
        require_user(user_id)?;
        if keyword.is_empty() {
            return Err(PreferenceError::EmptyKeyword);
        }

        let replaced = self
            .mutate(|doc| {
                doc.memos
                    .entry(user_id.to_string())
                    .or_default()
                    .upsert(keyword, content)
            })
            .await;
        debug!("Memo '{keyword}' for user {user_id} (replaced: {replaced})");
        Ok(replaced)
    }

    pub async fn memo(&self, user_id: &str, keyword: &str) -> Option<String> {
        let document = self.inner.document.read().await;
        document
            .memos
            .get(user_id)
            .and_then(|book| book.get(keyword))
            .map(str::to_string)
    }

    /// Keywords in insertion order
    pub async fn memo_keywords(&self, user_id: &str) -> Vec<String> {
        let document = self.inner.document.read().await;
        document
            .memos
            .get(user_id)
            .map(|book| book.keywords().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// All of a user's memos as (keyword, content) pairs, in insertion order
    pub async fn memos_for(&self, user_id: &str) -> Vec<(String, String)> {
        let document = self.inner.document.read().await;
        document
            .memos
            .get(user_id)
            .map(|book| {
                book.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove a memo. Returns whether it existed; nothing is saved when it didn't.
    pub async fn forget_memo(&self, user_id: &str, keyword: &str) -> bool {
        let mut document = self.inner.document.write().await;
        let removed = document
            .memos
            .get_mut(user_id)
            .map(|book| book.remove(keyword))
            .unwrap_or(false);
        if removed && document.memos.get(user_id).is_some_and(|book| book.is_empty()) {
            document.memos.remove(user_id);
        }

        if removed {
            if let Err(e) = self.inner.store.save(&document).await {
                error!("Failed to persist preferences, keeping in-memory state: {e}");
            }
        }
        removed
    }

    /// Forget everything stored for one user
    pub async fn reset_user(&self, user_id: &str) {
        info!("Resetting stored settings for user {user_id}");
        self.mutate(|doc| doc.remove_user(user_id)).await;
    }

    /// Forget everything stored for every user. Callers must check privileges.
    pub async fn reset_all(&self) {
        info!("Clearing all stored preferences");
        self.mutate(PreferenceDocument::clear).await;
    }

    pub async fn export(&self, scope: &ExportScope) -> MemoryExport {
        let document = self.inner.document.read().await;
        match scope {
            ExportScope::All => MemoryExport {
                scope: "all",
                document: document.clone(),
            },
            ExportScope::User(user_id) => {
                let mut own = PreferenceDocument::default();
                if let Some(name) = document.nicknames.get(user_id) {
                    own.nicknames.insert(user_id.clone(), name.clone());
                }
                own.greeting.insert(
                    user_id.clone(),
                    document.greeting.get(user_id).copied().unwrap_or(false),
                );
                own.silent.insert(
                    user_id.clone(),
                    document.silent.get(user_id).copied().unwrap_or(false),
                );
                if let Some(book) = document.memos.get(user_id) {
                    own.memos.insert(user_id.clone(), book.clone());
                }
                if let Some(model) = document.models.get(user_id) {
                    own.models.insert(user_id.clone(), model.clone());
                }
                MemoryExport {
                    scope: "self",
                    document: own,
                }
            }
        }
    }
}

fn require_user(user_id: &str) -> Result<(), PreferenceError> {
    if user_id.is_empty() {
        Err(PreferenceError::EmptyUserId)
    } else {
        Ok(())
    }
}
