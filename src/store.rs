//! Key-value store backing the admin override.
//!
//! The file store keeps every key in one JSON object so an override survives
//! between sessions; the memory store is used for ephemeral sessions.
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "store.json";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
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

/// JSON-object store at `<dir>/store.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(STORE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let bytes =
            fs::read(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse store {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(entries).context("serialize store")?;
        fs::write(&self.path, text.as_bytes())
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut store = FileStore::new(dir.path());
        assert_eq!(store.get("k").expect("get"), None);

        store.set("k", "{\"procedures\":[]}").expect("set");
        store.set("other", "x").expect("set other");

        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get("k").expect("get").as_deref(),
            Some("{\"procedures\":[]}")
        );

        store.remove("k").expect("remove");
        assert_eq!(reopened.get("k").expect("get"), None);
        assert_eq!(reopened.get("other").expect("get").as_deref(), Some("x"));

        assert!(store.path().is_file());
    }

    #[test]
    fn memory_store_remove_missing_key_is_noop() {
        let mut store = MemoryStore::new();
        store.remove("absent").expect("remove");
        store.set("a", "1").expect("set");
        store.remove("a").expect("remove");
        assert_eq!(store.get("a").expect("get"), None);
    }

    #[test]
    fn corrupt_store_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = FileStore::new(dir.path());
        fs::write(store.path(), "not json").expect("write store");
        let err = store.get("k").expect_err("corrupt store");
        assert!(format!("{err:#}").contains("parse store"));
    }
}
