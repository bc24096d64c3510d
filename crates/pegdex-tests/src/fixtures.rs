//! Test fixture utilities for building raw records and batch files.

use std::fs;
use std::path::{Path, PathBuf};

use pegdex_model::{AssetHandle, ComponentRecord, EntityKind, GameObject, RawRecord, RawValue, SpriteMetadata};
use tempfile::TempDir;

/// The relic record from the game's own relic table.
pub fn orbelisk_record() -> RawRecord {
    RawRecord::new()
        .with("locKey", "orbelisk")
        .with("englishDisplayName", "Orbelisk")
        .with("effect", "12")
        .with("globalRarity", "1")
        .with("sprite", AssetHandle::new(0, 4471))
}

/// An enemy record with a localization path.
pub fn enemy_record(loc_key: &str, health: i64) -> RawRecord {
    RawRecord::new()
        .with("LocKey", loc_key)
        .with("MaxHealth", health)
        .with("DamagePerMeleeAttack", 2.5)
        .with("location", 0)
}

/// A flat orb record carrying all five orb signature fields.
pub fn orb_record(loc_name: &str, damage: f64, level: f64) -> RawRecord {
    RawRecord::new()
        .with("locNameString", loc_name)
        .with("locName", loc_name)
        .with("DamagePerPeg", damage)
        .with("CritDamagePerPeg", damage * 2.0)
        .with("Level", level)
        .with(
            "locDescStrings",
            RawValue::List(vec![RawValue::from(format!("{}_desc", loc_name))]),
        )
}

/// A composed orb game object with its data nested under `ComponentData`.
pub fn orb_game_object(name: &str, loc_name: &str) -> GameObject {
    GameObject::new(name)
        .with_component(ComponentRecord::new("Transform", RawRecord::new()))
        .with_component(ComponentRecord::new(
            "MonoBehaviour",
            RawRecord::new().with(
                "ComponentData",
                RawRecord::new().with("OrbComponent", orb_record(loc_name, 2.0, 1.0)),
            ),
        ))
}

/// Catalog sprite with an assigned export path.
pub fn catalog_sprite(id: &str, name: &str, kind: EntityKind) -> SpriteMetadata {
    SpriteMetadata::single(id, name, kind, 64, 64)
        .with_file_path(format!("sprites/{}/{}.png", kind.dir_name(), id))
}

/// A temporary working directory holding batch, localization and cache files.
pub struct BatchFixture {
    pub root: TempDir,
}

impl BatchFixture {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Default cache file location inside the fixture.
    pub fn cache_path(&self) -> PathBuf {
        self.root.path().join("cache").join("correlations.json")
    }

    /// Writes a JSON value to `name` and returns its path.
    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = self.root.path().join(name);
        let json = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
        fs::write(&path, json).expect("Failed to write fixture file");
        path
    }
}

impl Default for BatchFixture {
    fn default() -> Self {
        Self::new()
    }
}
