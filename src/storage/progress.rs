//! Persisted completion set
//!
//! The set is stored as one JSON array of document IDs under a single key
//! (a file in `.tutor/progress.json` for the CLI). Backends only move raw
//! strings; [`ProgressStore`] owns the format and the failure policy:
//!
//! - Absent, unreadable or unparsable data reads as the empty set
//! - A corrupt value is left on disk until the next `mark_complete`
//! - A failed write is logged; the caller still gets the updated set

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use thiserror::Error;

use crate::domain::{CompletionSet, DocumentId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Progress storage unavailable: {0}")]
    Unavailable(String),

    #[error("Progress data is corrupt: {0}")]
    Corrupt(String),
}

/// Raw key/value storage for the serialized completion set
pub trait ProgressBackend: Send + Sync {
    /// Returns the stored value, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored value
    fn save(&self, value: &str) -> Result<(), StoreError>;
}

/// File-backed storage with locking and atomic replace
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default backend for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".tutor").join("progress.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unavailable(action: &str, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{} {}: {}", action, path.display(), err))
}

impl ProgressBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path).map_err(|e| unavailable("open", &self.path, e))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .map_err(|e| unavailable("lock", &self.path, e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| unavailable("read", &self.path, e))?;

        // Lock is released when file is dropped
        Ok(Some(content))
    }

    fn save(&self, value: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| unavailable("create", parent, e))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| unavailable("create", &temp_path, e))?;

            file.lock_exclusive()
                .map_err(|e| unavailable("lock", &temp_path, e))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(value.as_bytes())
                .and_then(|_| writer.flush())
                .map_err(|e| unavailable("write", &temp_path, e))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| unavailable("replace", &self.path, e))
    }
}

/// In-memory storage, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryBackend {
    value: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a raw stored value
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
            unavailable: false,
        }
    }

    /// A backend whose every call fails
    pub fn unavailable() -> Self {
        Self {
            value: Mutex::new(None),
            unavailable: true,
        }
    }

    /// Current raw value
    pub fn value(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProgressBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory backend disabled".to_string()));
        }
        Ok(self.value())
    }

    fn save(&self, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory backend disabled".to_string()));
        }
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(value.to_string());
        Ok(())
    }
}

/// The progress model over a backend
pub struct ProgressStore<B: ProgressBackend> {
    backend: B,
    /// Serializes read-modify-write within this process
    write_lock: Mutex<()>,
}

impl<B: ProgressBackend> ProgressStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Strict load: absent data is empty, anything else must parse
    pub fn load(&self) -> Result<CompletionSet, StoreError> {
        match self.backend.load()? {
            None => Ok(CompletionSet::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))
            }
        }
    }

    /// Serializes and stores the full set
    pub fn save(&self, set: &CompletionSet) -> Result<(), StoreError> {
        let raw = serde_json::to_string(set).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        self.backend.save(&raw)
    }

    /// Current completion set; any storage problem yields the empty set
    pub fn get_complete_docs(&self) -> CompletionSet {
        match self.load() {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!("reading progress failed, using empty set: {}", e);
                CompletionSet::new()
            }
        }
    }

    /// Adds a document to the set and persists the result.
    ///
    /// Idempotent. Returns the updated set even when persisting fails.
    pub fn mark_complete(&self, id: DocumentId) -> CompletionSet {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut set = self.get_complete_docs();
        let added = set.insert(id.clone());
        tracing::debug!(%id, added, "marking document complete");

        if let Err(e) = self.save(&set) {
            tracing::warn!("persisting progress failed: {}", e);
        }
        set
    }
}
