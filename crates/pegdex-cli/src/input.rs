//! Batch input loading.
//!
//! A batch is a JSON document listing the assets handed over by the bundle
//! walker, each either a flat record or a composed game object, plus an
//! optional sprite catalog:
//!
//! ```json
//! {
//!   "assets": [
//!     { "name": "Orbelisk", "source": { "record": { "locKey": "orbelisk" } } },
//!     { "name": "StoneOrb-Lvl1", "source": { "game_object": { "name": "StoneOrb-Lvl1" } } }
//!   ],
//!   "catalog": []
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pegdex_extract::LocalizationTable;
use pegdex_model::{EntityKind, GameObject, LocParams, RawRecord, SpriteCatalog, SpriteHandle};
use serde::{Deserialize, Serialize};

/// Where an asset's fields come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSource {
    Record(RawRecord),
    GameObject(GameObject),
}

/// Direct sprite reference carried by an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteInput {
    pub handle: SpriteHandle,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Sprite or texture name in the bundle.
    pub name: String,
}

/// One asset to classify and extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub name: String,
    /// Kind chosen by the caller; skips the classification order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,
    pub source: AssetSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc_params: Option<LocParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteInput>,
}

impl AssetInput {
    pub fn record(name: impl Into<String>, record: RawRecord) -> Self {
        Self {
            name: name.into(),
            kind: None,
            source: AssetSource::Record(record),
            loc_params: None,
            sprite: None,
        }
    }

    pub fn game_object(object: GameObject) -> Self {
        Self {
            name: object.name.clone(),
            kind: None,
            source: AssetSource::GameObject(object),
            loc_params: None,
            sprite: None,
        }
    }

    /// Builder method to set a kind hint.
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Builder method to set localization parameters.
    pub fn with_loc_params(mut self, params: LocParams) -> Self {
        self.loc_params = Some(params);
        self
    }

    /// Builder method to attach a direct sprite reference.
    pub fn with_sprite(mut self, sprite: SpriteInput) -> Self {
        self.sprite = Some(sprite);
        self
    }
}

/// A batch of assets plus the sprite catalog to correlate against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub assets: Vec<AssetInput>,
    #[serde(default)]
    pub catalog: SpriteCatalog,
}

/// Loads a batch file.
pub fn load_batch(path: &Path) -> Result<BatchInput> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse batch file: {}", path.display()))
}

/// Loads a standalone sprite catalog file (a JSON array of sprites).
pub fn load_catalog(path: &Path) -> Result<SpriteCatalog> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

/// Loads a localization table.
pub fn load_localization(path: &Path) -> Result<LocalizationTable> {
    LocalizationTable::load(path)
        .with_context(|| format!("Failed to load localization file: {}", path.display()))
}
