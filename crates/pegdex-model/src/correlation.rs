//! Entity to sprite correlation records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Strategy that produced a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Normalized names are identical.
    Exact,
    /// One name contains a variant of the other.
    Normalized,
    /// Edit-distance similarity above threshold.
    Fuzzy,
    /// Shared significant keyword.
    Keyword,
    /// No sprite found.
    #[serde(rename = "none")]
    NoMatch,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Exact => "exact",
            CorrelationMethod::Normalized => "normalized",
            CorrelationMethod::Fuzzy => "fuzzy",
            CorrelationMethod::Keyword => "keyword",
            CorrelationMethod::NoMatch => "none",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link between an entity and a catalog sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub entity_id: String,

    pub entity_type: EntityKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlated_sprite_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_file_path: Option<String>,

    /// 0.0 to 1.0.
    pub confidence: f64,

    pub method: CorrelationMethod,

    /// Runner-up sprite ids, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_sprite_ids: Vec<String>,
}

impl Correlation {
    /// Builds the persistent key `"{entityType}:{entityId}"`.
    pub fn cache_key(kind: EntityKind, entity_id: &str) -> String {
        format!("{}:{}", kind, entity_id)
    }

    /// Creates a successful correlation.
    pub fn matched(
        kind: EntityKind,
        entity_id: impl Into<String>,
        sprite_id: impl Into<String>,
        sprite_file_path: Option<String>,
        confidence: f64,
        method: CorrelationMethod,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type: kind,
            correlated_sprite_id: Some(sprite_id.into()),
            sprite_file_path,
            confidence: confidence.clamp(0.0, 1.0),
            method,
            alternate_sprite_ids: Vec::new(),
        }
    }

    /// Creates a "no sprite" correlation with zero confidence.
    pub fn unmatched(kind: EntityKind, entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type: kind,
            correlated_sprite_id: None,
            sprite_file_path: None,
            confidence: 0.0,
            method: CorrelationMethod::NoMatch,
            alternate_sprite_ids: Vec::new(),
        }
    }

    /// Builder method to set alternates.
    pub fn with_alternates(mut self, alternates: Vec<String>) -> Self {
        self.alternate_sprite_ids = alternates;
        self
    }

    pub fn key(&self) -> String {
        Self::cache_key(self.entity_type, &self.entity_id)
    }

    pub fn is_match(&self) -> bool {
        self.correlated_sprite_id.is_some()
    }
}
