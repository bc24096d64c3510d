//! Persistent correlation cache.
//!
//! Correlations are stored as a single JSON document keyed by
//! `"{entityType}:{entityId}"`. Writes are merges: saving re-reads the file
//! and overlays the in-memory entries, so entries written by earlier runs
//! survive unless the same key is correlated again.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pegdex_model::{Correlation, CorrelationMethod, EntityKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Current store file format version.
pub const STORE_VERSION: u32 = 1;

/// Errors that can occur while reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write the store file.
    #[error("correlation store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is not valid JSON for this format.
    #[error("failed to parse correlation store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize the store.
    #[error("failed to serialize correlation store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The file was written by a newer format.
    #[error("unsupported correlation store version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    correlations: BTreeMap<String, Correlation>,
}

/// Summary of the store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreInfo {
    pub entry_count: usize,
    pub matched_count: usize,
    pub by_method: BTreeMap<CorrelationMethod, usize>,
}

/// In-memory correlation cache with merge-on-save persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationStore {
    entries: BTreeMap<String, Correlation>,
}

impl CorrelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no correlation store, starting empty");
                return Ok(Self::new());
            }
            Err(err) => return Err(StoreError::io(path, err)),
        };

        let file: StoreFile = serde_json::from_str(&json).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.version > STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: file.version,
                expected: STORE_VERSION,
            });
        }

        debug!(path = %path.display(), entries = file.correlations.len(), "loaded correlation store");
        Ok(Self {
            entries: file.correlations,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Correlation> {
        self.entries.get(key)
    }

    pub fn get_for(&self, kind: EntityKind, entity_id: &str) -> Option<&Correlation> {
        self.get(&Correlation::cache_key(kind, entity_id))
    }

    /// Inserts a correlation, replacing any entry with the same key.
    pub fn merge(&mut self, correlation: Correlation) -> Option<Correlation> {
        self.entries.insert(correlation.key(), correlation)
    }

    /// Merges every entry of `other`, `other` winning on conflicts.
    pub fn extend(&mut self, other: CorrelationStore) {
        self.entries.extend(other.entries);
    }

    /// Removes every entry, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Correlation> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self) -> StoreInfo {
        let mut info = StoreInfo {
            entry_count: self.entries.len(),
            ..StoreInfo::default()
        };
        for correlation in self.entries.values() {
            if correlation.is_match() {
                info.matched_count += 1;
            }
            *info.by_method.entry(correlation.method).or_insert(0) += 1;
        }
        info
    }

    /// Writes the store, replacing the file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let file = StoreFile {
            version: STORE_VERSION,
            correlations: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))?;

        debug!(path = %path.display(), entries = self.entries.len(), "saved correlation store");
        Ok(())
    }

    /// Re-reads `path`, overlays this store on it and writes the result.
    /// Returns the number of entries written.
    pub fn save_merged(&self, path: &Path) -> Result<usize, StoreError> {
        let mut merged = Self::load(path)?;
        merged.extend(self.clone());
        merged.save(path)?;
        Ok(merged.len())
    }

    /// Deletes the store file, returning how many entries it held.
    pub fn remove_file(path: &Path) -> Result<usize, StoreError> {
        let count = Self::load(path)?.len();
        match fs::remove_file(path) {
            Ok(()) => Ok(count),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn exact(id: &str, sprite: &str) -> Correlation {
        Correlation::matched(EntityKind::Orb, id, sprite, None, 1.0, CorrelationMethod::Exact)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CorrelationStore::load(&dir.path().join("nope.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut store = CorrelationStore::new();
        assert!(store.merge(exact("stone", "stone_a")).is_none());
        let previous = store.merge(exact("stone", "stone_b")).unwrap();
        assert_eq!(previous.correlated_sprite_id.as_deref(), Some("stone_a"));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_for(EntityKind::Orb, "stone").unwrap().correlated_sprite_id.as_deref(),
            Some("stone_b")
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("correlations.json");

        let mut store = CorrelationStore::new();
        store.merge(exact("stone", "stone"));
        store.merge(Correlation::unmatched(EntityKind::Enemy, "ghost"));
        store.save(&path).unwrap();

        let loaded = CorrelationStore::load(&path).unwrap();
        assert_eq!(loaded, store);
        assert!(loaded.get("Enemy:ghost").is_some());
    }

    #[test]
    fn test_save_merged_keeps_other_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("correlations.json");

        let mut first = CorrelationStore::new();
        first.merge(exact("stone", "stone_old"));
        first.merge(exact("daggorb", "daggorb"));
        first.save(&path).unwrap();

        let mut second = CorrelationStore::new();
        second.merge(exact("stone", "stone_new"));
        assert_eq!(second.save_merged(&path).unwrap(), 2);

        let loaded = CorrelationStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(
            loaded.get("Orb:stone").unwrap().correlated_sprite_id.as_deref(),
            Some("stone_new")
        );
        assert!(loaded.get("Orb:daggorb").is_some());
    }

    #[test]
    fn test_info_and_clear() {
        let mut store = CorrelationStore::new();
        store.merge(exact("stone", "stone"));
        store.merge(exact("daggorb", "daggorb"));
        store.merge(Correlation::unmatched(EntityKind::Relic, "mystery"));

        let info = store.info();
        assert_eq!(info.entry_count, 3);
        assert_eq!(info.matched_count, 2);
        assert_eq!(info.by_method.get(&CorrelationMethod::Exact), Some(&2));
        assert_eq!(info.by_method.get(&CorrelationMethod::NoMatch), Some(&1));

        assert_eq!(store.clear(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("correlations.json");
        assert_eq!(CorrelationStore::remove_file(&path).unwrap(), 0);

        let mut store = CorrelationStore::new();
        store.merge(exact("stone", "stone"));
        store.save(&path).unwrap();
        assert_eq!(CorrelationStore::remove_file(&path).unwrap(), 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_newer_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("correlations.json");
        fs::write(&path, r#"{"version": 99, "correlations": {}}"#).unwrap();
        assert!(matches!(
            CorrelationStore::load(&path),
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
