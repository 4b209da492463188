//! Crash-safe JSON file store
//!
//! The only component that touches the filesystem. Writes go to a sibling
//! `<file>.tmp`, are flushed and synced, then renamed over the final path, so
//! the final path always holds either the previous or the new complete document.

use log::{debug, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use super::document::PreferenceDocument;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to encode preference document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Staging location for the next write: `<file>.tmp` next to the final path
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load the persisted document.
    ///
    /// A missing file, unreadable file, or unparseable content all yield the
    /// empty default document. Never fails.
    pub async fn load(&self) -> PreferenceDocument {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No preference file at {}, starting with empty memory",
                    self.path.display()
                );
                return PreferenceDocument::default();
            }
            Err(e) => {
                warn!(
                    "Failed to read {}: {e}. Starting with empty memory",
                    self.path.display()
                );
                return PreferenceDocument::default();
            }
        };

        match serde_json::from_slice::<PreferenceDocument>(&bytes) {
            Ok(mut doc) => {
                let dropped = doc.sanitize();
                if dropped > 0 {
                    warn!("Dropped {dropped} entries with empty ids from {}", self.path.display());
                }
                debug!(
                    "Loaded preferences from {} ({} users with nicknames, {} with memos)",
                    self.path.display(),
                    doc.nicknames.len(),
                    doc.memos.len()
                );
                doc
            }
            Err(e) => {
                warn!(
                    "Preference file {} is corrupt ({e}). Starting with empty memory",
                    self.path.display()
                );
                PreferenceDocument::default()
            }
        }
    }

    /// Serialize the full document and atomically replace the persisted copy.
    pub async fn save(&self, doc: &PreferenceDocument) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(doc)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &payload).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io(&temp_path, e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::io(&self.path, e));
        }

        debug!("Saved preferences to {} ({} bytes)", self.path.display(), payload.len());
        Ok(())
    }
}

async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}
