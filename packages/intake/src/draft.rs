//! Draft persistence for the intake wizard.
//!
//! One storage slot holds the serialized form between sessions. The slot is
//! device-local and global: two tabs editing at once race on the debounced
//! write and the last one wins. That is an accepted limitation of the
//! product, not something this layer tries to fix.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tokio::fs;
use tracing::warn;

use crate::form::IntakeForm;

/// Storage key for the single intake draft slot.
pub const DRAFT_KEY: &str = "mindtoweb_intake_draft";

/// Draft storage errors
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Draft storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DraftError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

pub type DraftResult<T> = Result<T, DraftError>;

/// Key-value slot for client-local persisted state.
///
/// Injectable so tests substitute an in-memory fake for the real
/// file-backed store.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn get(&self, key: &str) -> DraftResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> DraftResult<()>;
    async fn delete(&self, key: &str) -> DraftResult<()>;
}

/// In-memory draft store for tests.
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self, key: &str) -> DraftResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DraftResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> DraftResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// File-backed draft store under the platform config directory.
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new() -> Self {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindtoweb")
            .join("drafts");
        Self { dir }
    }

    /// Store drafts under a specific directory (used by tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Default for FileDraftStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn get(&self, key: &str) -> DraftResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> DraftResult<()> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> DraftResult<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Loads the saved draft, if any.
///
/// A corrupt or unreadable draft is logged and discarded so the wizard can
/// start from empty defaults instead of crashing.
pub async fn load_draft(store: &dyn DraftStore) -> Option<IntakeForm> {
    match store.get(DRAFT_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(form) => Some(form),
            Err(e) => {
                warn!("Discarding unreadable intake draft: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Could not read intake draft: {}", e);
            None
        }
    }
}
