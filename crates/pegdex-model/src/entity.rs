//! Typed entities produced by the extraction pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::correlation::{Correlation, CorrelationMethod};
use crate::sanitize::RawData;

/// Kind of domain entity an asset record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Relic,
    Enemy,
    Orb,
}

impl EntityKind {
    /// All kinds, in default classification order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Relic, EntityKind::Enemy, EntityKind::Orb];

    /// Display name, also used in correlation cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Relic => "Relic",
            EntityKind::Enemy => "Enemy",
            EntityKind::Orb => "Orb",
        }
    }

    /// Localization namespace for this kind's strings.
    pub fn namespace(&self) -> &'static str {
        match self {
            EntityKind::Relic => "Relics",
            EntityKind::Enemy => "Enemies",
            EntityKind::Orb => "Orbs",
        }
    }

    /// Directory name used for exported sprites.
    pub fn dir_name(&self) -> &'static str {
        match self {
            EntityKind::Relic => "relics",
            EntityKind::Enemy => "enemies",
            EntityKind::Orb => "orbs",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relic" | "relics" => Ok(EntityKind::Relic),
            "enemy" | "enemies" => Ok(EntityKind::Enemy),
            "orb" | "orbs" => Ok(EntityKind::Orb),
            other => Err(format!("unknown entity kind: '{}'", other)),
        }
    }
}

/// Relic rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelicRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Boss,
    Special,
    Unknown,
}

impl RelicRarity {
    /// Maps the raw `globalRarity` value to a tier.
    pub fn from_value(value: i64) -> Self {
        match value {
            0 => RelicRarity::Common,
            1 => RelicRarity::Uncommon,
            2 => RelicRarity::Rare,
            3 => RelicRarity::Boss,
            4 => RelicRarity::Special,
            _ => RelicRarity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelicRarity::Common => "COMMON",
            RelicRarity::Uncommon => "UNCOMMON",
            RelicRarity::Rare => "RARE",
            RelicRarity::Boss => "BOSS",
            RelicRarity::Special => "SPECIAL",
            RelicRarity::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RelicRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Broad orb role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrbType {
    #[default]
    Attack,
    Utility,
    Special,
}

impl OrbType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrbType::Attack => "ATTACK",
            OrbType::Utility => "UTILITY",
            OrbType::Special => "SPECIAL",
        }
    }
}

impl fmt::Display for OrbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relic-specific attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RelicDetails {
    /// Effect identifier, kept as text.
    pub effect: String,
    /// Raw `globalRarity` value.
    pub rarity_value: i64,
    /// Rarity tier derived from `rarity_value`.
    pub rarity: RelicRarity,
}

/// Enemy-specific attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnemyDetails {
    pub health: f64,
    pub attack_damage: f64,
    /// Area the enemy appears in (e.g. `FOREST`).
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health_cruciball: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_type: Option<String>,
}

/// Orb-specific attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrbDetails {
    pub damage_per_peg: f64,
    pub crit_damage_per_peg: f64,
    pub level: i64,
    pub orb_type: OrbType,
    /// Translated description lines, in source order.
    #[serde(default)]
    pub description_strings: Vec<String>,
}

/// Per-kind attributes of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EntityDetails {
    Relic(RelicDetails),
    Enemy(EnemyDetails),
    Orb(OrbDetails),
}

impl EntityDetails {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDetails::Relic(_) => EntityKind::Relic,
            EntityDetails::Enemy(_) => EntityKind::Enemy,
            EntityDetails::Orb(_) => EntityKind::Orb,
        }
    }
}

/// A classified, extracted entity with its sprite link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Slug derived from the asset name.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Sanitized copy of the originating record.
    #[serde(default)]
    pub raw_data: RawData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_file_path: Option<String>,

    /// Confidence of the sprite link, 0.0 to 1.0.
    #[serde(default)]
    pub correlation_confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_method: Option<CorrelationMethod>,

    #[serde(flatten)]
    pub details: EntityDetails,
}

impl EntityRecord {
    /// Creates an entity with no sprite link.
    pub fn new(id: impl Into<String>, name: impl Into<String>, details: EntityDetails) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            raw_data: RawData::new(),
            sprite_id: None,
            sprite_file_path: None,
            correlation_confidence: 0.0,
            correlation_method: None,
            details,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.details.kind()
    }

    /// Correlation cache key for this entity.
    pub fn cache_key(&self) -> String {
        Correlation::cache_key(self.kind(), &self.id)
    }

    /// Copies the sprite link from a correlation result.
    pub fn apply_correlation(&mut self, correlation: &Correlation) {
        self.sprite_id = correlation.correlated_sprite_id.clone();
        self.sprite_file_path = correlation.sprite_file_path.clone();
        self.correlation_confidence = correlation.confidence;
        self.correlation_method = Some(correlation.method);
    }

    pub fn has_sprite(&self) -> bool {
        self.sprite_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rarity_mapping() {
        assert_eq!(RelicRarity::from_value(0), RelicRarity::Common);
        assert_eq!(RelicRarity::from_value(1), RelicRarity::Uncommon);
        assert_eq!(RelicRarity::from_value(3), RelicRarity::Boss);
        assert_eq!(RelicRarity::from_value(-1), RelicRarity::Unknown);
        assert_eq!(RelicRarity::from_value(1).to_string(), "UNCOMMON");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("orbs".parse::<EntityKind>().unwrap(), EntityKind::Orb);
        assert_eq!(" Relic ".parse::<EntityKind>().unwrap(), EntityKind::Relic);
        assert!("peg".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_serializes_with_kind_tag() {
        let entity = EntityRecord::new(
            "stone",
            "Stone",
            EntityDetails::Orb(OrbDetails {
                damage_per_peg: 2.0,
                crit_damage_per_peg: 4.0,
                level: 1,
                orb_type: OrbType::Attack,
                description_strings: vec![],
            }),
        );

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "Orb");
        assert_eq!(json["orb_type"], "ATTACK");
        assert!(json.get("sprite_id").is_none());

        let parsed: EntityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, entity);
    }

    #[test]
    fn test_apply_correlation() {
        let mut entity = EntityRecord::new("slime", "Slime", EntityDetails::Enemy(EnemyDetails::default()));
        let correlation = Correlation::matched(
            EntityKind::Enemy,
            "slime",
            "slime_01",
            Some("sprites/enemies/slime_01.png".to_string()),
            0.9,
            CorrelationMethod::Normalized,
        );

        entity.apply_correlation(&correlation);
        assert_eq!(entity.sprite_id.as_deref(), Some("slime_01"));
        assert_eq!(entity.correlation_confidence, 0.9);
        assert_eq!(entity.correlation_method, Some(CorrelationMethod::Normalized));
        assert_eq!(entity.cache_key(), "Enemy:slime");
    }
}
