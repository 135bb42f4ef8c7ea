use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// String key-value storage for session history and settings.
///
/// There is no transactional guarantee: callers read, modify and write back.
pub trait KeyValueStore {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Get the platform-appropriate data directory for pft-calc
pub fn get_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("pft-calc/store"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.local/share/pft-calc/store",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Disk-persistent store backed by a cacache directory.
#[derive(Debug, Clone)]
pub struct CacacheStore {
    path: PathBuf,
}

impl CacacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for CacacheStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let present = cacache::metadata_sync(&self.path, key)
            .with_context(|| format!("Failed to read index for '{}' in {}", key, self.path.display()))?
            .is_some();
        if !present {
            tracing::debug!(key, "store miss");
            return Ok(None);
        }

        let bytes = cacache::read_sync(&self.path, key)
            .with_context(|| format!("Failed to read '{}' from {}", key, self.path.display()))?;
        let value = String::from_utf8(bytes)
            .with_context(|| format!("Stored value for '{}' is not valid UTF-8", key))?;
        tracing::debug!(key, bytes = value.len(), "store hit");
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        cacache::write_sync(&self.path, key, value.as_bytes())
            .with_context(|| format!("Failed to write '{}' to {}", key, self.path.display()))?;
        tracing::debug!(key, bytes = value.len(), "store write");
        Ok(())
    }
}

/// In-memory store, used in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_cacache_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacacheStore::new(dir.path());
        assert_eq!(store.get("@paf_pft_sessions").unwrap(), None);
    }

    #[test]
    fn test_cacache_store_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CacacheStore::new(dir.path());

        store.set("@paf_pft_age", "24").unwrap();
        assert_eq!(store.get("@paf_pft_age").unwrap().as_deref(), Some("24"));

        store.set("@paf_pft_age", "25").unwrap();
        assert_eq!(store.get("@paf_pft_age").unwrap().as_deref(), Some("25"));

        // A fresh handle on the same directory sees the data
        let reopened = CacacheStore::new(dir.path());
        assert_eq!(reopened.get("@paf_pft_age").unwrap().as_deref(), Some("25"));
    }
}
