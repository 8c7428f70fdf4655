//! # Key-Value Store
//!
//! The durable layer under the photo repository: opaque string keys mapped
//! to JSON text, nothing more.
//!
//! `FileStore` keeps one `<key>.json` file per key in the data directory
//! (default `~/.sortit/data/`). All writes use atomic rename (write `.tmp`,
//! then `rename()`), so a crash leaves either the old or the new document.
//! There is no cross-key transaction.
//!
//! Both stores accept an optional byte quota covering all keys together.
//! A write that would exceed it fails with `StorageError::QuotaExceeded`
//! and leaves the previous value in place.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "storage I/O error: {e}"),
            StorageError::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing '{key}' ({needed} bytes needed, limit {limit}). \
                 Delete some photos to free space"
            ),
            StorageError::Serialize(e) => write!(f, "failed to encode stored data: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
            StorageError::QuotaExceeded { .. } => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Fail if replacing `current_len` bytes with `new_len` would push `used` past `limit`.
fn check_quota(
    key: &str,
    used: usize,
    current_len: usize,
    new_len: usize,
    limit: Option<usize>,
) -> Result<(), StorageError> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let needed = used - current_len + new_len;
    if needed > limit {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            limit,
        });
    }
    Ok(())
}

// ============================================================================
// FileStore
// ============================================================================

/// Returns `~/.sortit/data/`, or `.sortit/data` under the working
/// directory when there is no home directory.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".sortit")
        .join("data")
}

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Total bytes held by all stored documents.
    fn used_bytes(&self) -> io::Result<usize> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                total += fs::metadata(&path)?.len() as usize;
            }
        }
        Ok(total)
    }
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if self.quota.is_some() {
            let current_len = fs::metadata(&path).map(|m| m.len() as usize).unwrap_or(0);
            check_quota(key, self.used_bytes()?, current_len, value.len(), self.quota)?;
        }
        atomic_write(&path, value)?;
        debug!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(limit),
        }
    }

    fn used_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let current_len = self.entries.get(key).map_or(0, String::len);
        check_quota(key, self.used_bytes(), current_len, value.len(), self.quota)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
