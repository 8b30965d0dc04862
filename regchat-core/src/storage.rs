//! Key-value persistence for chat state
//!
//! The session store persists each piece of state (session collection,
//! active chat id, language) under its own key as an independent JSON
//! document. The backing store is injected so the state machine can be
//! tested against an in-memory implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::Result;

/// Persistence capability injected into the session store
pub trait KvStore {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; removing an absent key is fine
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed store: one `<key>.json` file per key under a data directory
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `dir`; the directory is created lazily on
    /// first write
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store used in tests and anywhere persistence is not wanted
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: HashMap<String, String>,
}

impl MemoryKvStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileKvStore::new(temp_dir.path());

        assert!(store.get("chats").is_none());
        store.set("chats", "[1,2,3]").unwrap();
        assert_eq!(store.get("chats").as_deref(), Some("[1,2,3]"));

        store.set("chats", "[]").unwrap();
        assert_eq!(store.get("chats").as_deref(), Some("[]"));

        store.remove("chats").unwrap();
        assert!(store.get("chats").is_none());
    }

    #[test]
    fn test_file_store_sanitizes_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileKvStore::new(temp_dir.path());

        store.set("current/chat", "null").unwrap();
        assert!(temp_dir.path().join("current_chat.json").exists());
        assert_eq!(store.get("current/chat").as_deref(), Some("null"));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileKvStore::new(temp_dir.path());
        store.remove("missing").unwrap();

        let mut memory = MemoryKvStore::new();
        memory.remove("missing").unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryKvStore::new();
        store.set("language", "\"ar\"").unwrap();
        assert_eq!(store.get("language").as_deref(), Some("\"ar\""));
        store.remove("language").unwrap();
        assert!(store.get("language").is_none());
    }
}
