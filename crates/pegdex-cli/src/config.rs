//! Pipeline configuration.
//!
//! All keys are optional; anything missing falls back to the defaults of the
//! component it configures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pegdex_model::EntityKind;
use pegdex_sprite::{CorrelatorConfig, GeometryConfig};
use serde::{Deserialize, Serialize};

/// Configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Order in which entity kinds are tried when no kind hint is given.
    pub classification_order: Vec<EntityKind>,
    pub geometry: GeometryConfig,
    pub correlator: CorrelatorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classification_order: EntityKind::ALL.to_vec(),
            geometry: GeometryConfig::default(),
            correlator: CorrelatorConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Default correlation cache location (platform cache directory).
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("pegdex").join("correlations.json"))
}

/// Resolves the cache path from an explicit override or the default.
pub fn resolve_cache_path(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_cache_path().context("Failed to determine cache directory"),
    }
}
