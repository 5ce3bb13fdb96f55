//! Persistent key-value storage for the session.
//!
//! A [`SessionStore`] is the client's equivalent of browser local storage:
//! a flat map of string keys to string values. Multi-key writes are atomic
//! so the token and the profile are never observed half-updated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

// ============================================================================
// SessionStore Trait
// ============================================================================

/// Key-value storage backing a [`Session`](crate::Session).
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several values in one atomic step.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove several keys in one atomic step. Missing keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> Result<()>;

    /// Write a single value.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    /// Remove a single key.
    fn remove(&self, key: &str) -> Result<()> {
        self.remove_many(&[key])
    }
}

/// Shared store for use across clients and tasks.
pub type SharedSessionStore = Arc<dyn SessionStore>;

// ============================================================================
// FileSessionStore
// ============================================================================

/// File-backed store: one JSON object per file.
///
/// Every write replaces the whole document via a sibling temp file and a
/// rename, so readers see either the old or the new document.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store persisting to `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Store(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("Failed to parse {}: {}", self.path.display(), e)))
    }

    fn write_document(&self, document: &HashMap<String, String>) -> Result<()> {
        if document.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).map_err(|e| {
                    Error::Store(format!("Failed to delete {}: {}", self.path.display(), e))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Store(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| Error::Store(format!("Failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            Error::Store(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        for (key, value) in entries {
            document.insert((*key).to_string(), (*value).to_string());
        }
        self.write_document(&document)?;
        tracing::debug!(path = %self.path.display(), keys = entries.len(), "Session store updated");
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut document = self.read_document()?;
        let before = document.len();
        for key in keys {
            document.remove(*key);
        }
        if document.len() != before {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

// ============================================================================
// MemorySessionStore (for testing and embedding)
// ============================================================================

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let store = FileSessionStore::new(temp.path().join("session.json"));
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_set_and_get() {
        let temp = tempdir().unwrap();
        let store = FileSessionStore::new(temp.path().join("nested").join("session.json"));

        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        // A second handle on the same file sees the write
        let other = FileSessionStore::new(store.path());
        assert_eq!(other.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_remove_many_deletes_empty_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.json");
        let store = FileSessionStore::new(&path);

        store
            .set_many(&[(TOKEN_KEY, "abc"), (USER_KEY, "{}")])
            .unwrap();
        assert!(path.exists());

        store.remove_many(&[TOKEN_KEY, USER_KEY]).unwrap();
        assert!(!path.exists());
        assert_eq!(store.get(USER_KEY).unwrap(), None);

        // Idempotent
        store.remove(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get(TOKEN_KEY), Err(Error::Store(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        store.set(TOKEN_KEY, "t").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }
}
