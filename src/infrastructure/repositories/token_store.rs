//! TokenStore implementations: on-disk JSON map and in-memory map

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::{ClientError, TokenStore};

/// File-backed store, the desktop analogue of browser local storage.
///
/// Values are cached in memory and written through to a JSON object on
/// every mutation.
pub struct FileTokenStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileTokenStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = DashMap::new();

        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            if !raw.trim().is_empty() {
                let map: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
                    ClientError::Storage(format!("Corrupt store {}: {}", path.display(), e))
                })?;
                for (k, v) in map {
                    entries.insert(k, v);
                }
            }
        }

        tracing::debug!("Token store opened at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    fn write(&self, snapshot: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    /// The cache only changes once the file write has succeeded.
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut next = self.snapshot();
        next.insert(key.to_string(), value.to_string());
        self.write(&next).inspect_err(|e| {
            tracing::error!("Failed to persist {}: {}", key, e);
        })?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.snapshot();
        next.remove(key);
        self.write(&next)?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Volatile store for tests and hosts that keep no session across restarts.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: DashMap<String, String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.entries.remove(key);
        Ok(())
    }
}
