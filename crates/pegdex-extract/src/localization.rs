//! Localization lookups.
//!
//! The extractor only needs "translate this key"; where the strings come from
//! is up to the caller. [`LocalizationTable`] is the in-memory implementation
//! loaded from a flat JSON object of `key -> text`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading localization data.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// Failed to read the localization file.
    #[error("failed to read localization file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a flat JSON object of strings.
    #[error("failed to parse localization file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Translates localization keys such as `"Relics/orbelisk_name"`.
pub trait Localizer: Send + Sync {
    /// Returns the translation, or `None` when the key is unknown or the
    /// translation is empty.
    fn translate(&self, key: &str) -> Option<String>;
}

/// Localizer that knows no keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl Localizer for NoLocalization {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory translation table.
#[derive(Debug, Clone, Default)]
pub struct LocalizationTable {
    entries: HashMap<String, String>,
}

impl LocalizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat JSON object of `key -> text`.
    pub fn from_json_str(json: &str) -> Result<Self, LocalizationError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Loads a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LocalizationError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builder method to add a translation.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for LocalizationTable {
    fn translate(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_translations_are_missing() {
        let table = LocalizationTable::new()
            .with("Orbs/stone_name", "Stone")
            .with("Orbs/blank_name", "  ");
        assert_eq!(table.translate("Orbs/stone_name").as_deref(), Some("Stone"));
        assert_eq!(table.translate("Orbs/blank_name"), None);
        assert_eq!(table.translate("Orbs/unknown_name"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Relics/orbelisk_name": "Orbelisk"}}"#).unwrap();

        let table = LocalizationTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.translate("Relics/orbelisk_name").as_deref(), Some("Orbelisk"));
    }

    #[test]
    fn test_parse_error() {
        let err = LocalizationTable::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, LocalizationError::Parse(_)));
    }
}
