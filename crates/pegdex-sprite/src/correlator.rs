//! Entity to sprite correlation.
//!
//! The correlator first consults its [`CorrelationStore`], then tries each
//! [`MatchStrategy`] in order. The first strategy to propose a sprite wins.
//! Every outcome, including "no match", is merged back into the store.

use pegdex_model::{Correlation, CorrelationMethod, EntityKind, SpriteCatalog, SpriteMetadata};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::CorrelationStore;
use crate::strategy::{
    ExactStrategy, FuzzyStrategy, KeywordStrategy, MatchStrategy, NormalizedStrategy, EXACT_CONFIDENCE,
};

/// Tunable thresholds for correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelatorConfig {
    /// Minimum similarity accepted by the fuzzy stage.
    pub fuzzy_threshold: f64,
    /// Runner-up sprites kept by the fuzzy stage.
    pub max_alternates: usize,
    /// Minimum sprite name length for the normalized stage to match a sprite
    /// name contained in the entity name.
    pub min_reverse_len: usize,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.7,
            max_alternates: 3,
            min_reverse_len: 3,
        }
    }
}

/// Builds the default cascade: exact, normalized, fuzzy, keyword.
pub fn default_strategies(config: &CorrelatorConfig) -> Vec<Box<dyn MatchStrategy>> {
    vec![
        Box::new(ExactStrategy),
        Box::new(NormalizedStrategy {
            min_reverse_len: config.min_reverse_len,
        }),
        Box::new(FuzzyStrategy {
            threshold: config.fuzzy_threshold,
            max_alternates: config.max_alternates,
        }),
        Box::new(KeywordStrategy),
    ]
}

/// Links entities to catalog sprites.
pub struct SpriteCorrelator {
    store: CorrelationStore,
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl SpriteCorrelator {
    pub fn new(config: &CorrelatorConfig, store: CorrelationStore) -> Self {
        Self::with_strategies(store, default_strategies(config))
    }

    /// Creates a correlator with a custom cascade.
    pub fn with_strategies(store: CorrelationStore, strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { store, strategies }
    }

    /// Methods of the cascade, in order.
    pub fn methods(&self) -> Vec<CorrelationMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// Correlates one entity against `catalog`.
    ///
    /// A cached correlation is returned as-is when its sprite is still in the
    /// catalog; cached "no match" outcomes are returned as-is too.
    pub fn correlate(
        &mut self,
        entity_id: &str,
        entity_name: &str,
        kind: EntityKind,
        catalog: &SpriteCatalog,
    ) -> Correlation {
        let key = Correlation::cache_key(kind, entity_id);
        if let Some(cached) = self.store.get(&key) {
            let still_valid = match &cached.correlated_sprite_id {
                Some(sprite_id) => catalog.contains_id(sprite_id),
                None => true,
            };
            if still_valid {
                debug!(key = %key, method = %cached.method, "correlation cache hit");
                return cached.clone();
            }
        }

        let correlation = self
            .strategies
            .iter()
            .find_map(|strategy| {
                strategy.attempt(entity_name, catalog).map(|m| {
                    Correlation::matched(
                        kind,
                        entity_id,
                        m.sprite.id.clone(),
                        m.sprite.file_path.clone(),
                        m.confidence,
                        strategy.method(),
                    )
                    .with_alternates(m.alternates)
                })
            })
            .unwrap_or_else(|| Correlation::unmatched(kind, entity_id));

        debug!(
            key = %key,
            method = %correlation.method,
            confidence = correlation.confidence,
            sprite = correlation.correlated_sprite_id.as_deref().unwrap_or("-"),
            "correlated entity"
        );
        self.store.merge(correlation.clone());
        correlation
    }

    /// Records a sprite taken directly from the entity's own reference.
    pub fn record_direct(&mut self, kind: EntityKind, entity_id: &str, sprite: &SpriteMetadata) -> Correlation {
        let correlation = Correlation::matched(
            kind,
            entity_id,
            sprite.id.clone(),
            sprite.file_path.clone(),
            EXACT_CONFIDENCE,
            CorrelationMethod::Exact,
        );
        self.store.merge(correlation.clone());
        correlation
    }

    pub fn store(&self) -> &CorrelationStore {
        &self.store
    }

    pub fn into_store(self) -> CorrelationStore {
        self.store
    }
}
