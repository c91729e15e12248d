//! Key-value persistence for local state.
//!
//! Values are opaque strings stored under a key.
//! Callers decide how to encode values and how to treat failures;
//! the stores only move bytes.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fslock::LockFile;
use thiserror::Error;
use tracing::debug;

/// Name of the storefront directory inside the user's data directory.
const STOREFRONT_DIR_NAME: &str = "storefront";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no persistent storage available")]
    Unavailable,
    #[error("value stored in an invalid location: {0}")]
    InvalidLocation(PathBuf),
    #[error("failed to read stored value")]
    Read(#[source] io::Error),
    #[error("failed to write stored value")]
    Write(#[source] io::Error),
    #[error("failed to lock stored value")]
    Lock(#[source] fslock::Error),
    #[error("failed to encode value")]
    Encode(#[source] serde_json::Error),
    #[error("failed to rename temporary file")]
    Persist(#[source] tempfile::PersistError),
    #[error("in-memory store is poisoned")]
    Poisoned,
}

/// A named-record store with explicit load and save.
pub trait KeyValueStore {
    /// Returns `None` if nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).save(key, value)
    }
}

// ---------------------------------------------------------------------------
// File backed store
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes are atomic: the value is written to a temporary file in the same
/// directory and renamed over the previous value while holding
/// `<dir>/<key>.lock`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store in the storefront directory of the user's data directory,
    /// e.g. `$XDG_DATA_HOME/storefront`.
    pub fn in_data_dir() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir().ok_or(StorageError::Unavailable)?;
        Ok(Self::new(data_dir.join(STOREFRONT_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// The lock file is separate from the value because the value is
    /// replaced on write.
    /// Its presence does not indicate an active lock.
    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.lock"))
    }

    fn acquire_lock(&self, key: &str) -> Result<LockFile, StorageError> {
        fs::create_dir_all(&self.dir).map_err(StorageError::Write)?;
        let mut lock = LockFile::open(&self.lock_path(key)).map_err(StorageError::Lock)?;
        lock.lock().map_err(StorageError::Lock)?;
        Ok(lock)
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(?path, "no stored value");
                Ok(None)
            },
            Err(e) => Err(StorageError::Read(e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key);
        let _lock = self.acquire_lock(key)?;
        write_atomically(value, &path)?;
        debug!(?path, "saved value");
        Ok(())
    }
}

/// Write `value` to a temporary file next to `path` and rename it to `path`.
///
/// `path` must have a parent directory.
fn write_atomically(value: &str, path: &Path) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::InvalidLocation(path.to_path_buf()))?;
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(StorageError::Write)?;
    temp_file
        .write_all(value.as_bytes())
        .map_err(StorageError::Write)?;
    temp_file.persist(path).map_err(StorageError::Persist)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory and absent stores
// ---------------------------------------------------------------------------

/// An in-memory store.
///
/// Clones share the same records, which models several views backed by one
/// durable store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut records = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stands in when no persistent storage exists in the current context.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl KeyValueStore for NoStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
