//! Name-matching strategies tried in order by the correlator.
//!
//! Each strategy looks at the entity name and the catalog on its own and
//! either proposes a sprite or passes. Confidence is fixed per strategy,
//! except for fuzzy matching where it is the computed similarity.

use pegdex_model::{CorrelationMethod, SpriteCatalog, SpriteMetadata};

use crate::similarity::{contains_on_boundary, keywords, normalize_name, similarity, split_camel_case};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const NORMALIZED_CONFIDENCE: f64 = 0.9;
pub const KEYWORD_CONFIDENCE: f64 = 0.6;

/// A sprite proposed by a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyMatch<'a> {
    pub sprite: &'a SpriteMetadata,
    pub confidence: f64,
    /// Runner-up sprite ids, best first.
    pub alternates: Vec<String>,
}

impl<'a> StrategyMatch<'a> {
    fn new(sprite: &'a SpriteMetadata, confidence: f64) -> Self {
        Self {
            sprite,
            confidence,
            alternates: Vec::new(),
        }
    }
}

/// One stage of the correlation cascade.
pub trait MatchStrategy: Send + Sync {
    /// Method recorded on correlations produced by this strategy.
    fn method(&self) -> CorrelationMethod;

    /// Proposes a sprite for `entity_name`, or `None` to pass.
    fn attempt<'a>(&self, entity_name: &str, catalog: &'a SpriteCatalog) -> Option<StrategyMatch<'a>>;
}

// ============================================================================
// Exact
// ============================================================================

/// Normalized names are equal.
pub struct ExactStrategy;

impl MatchStrategy for ExactStrategy {
    fn method(&self) -> CorrelationMethod {
        CorrelationMethod::Exact
    }

    fn attempt<'a>(&self, entity_name: &str, catalog: &'a SpriteCatalog) -> Option<StrategyMatch<'a>> {
        let target = normalize_name(entity_name);
        if target.is_empty() {
            return None;
        }
        catalog
            .iter()
            .find(|sprite| normalize_name(&sprite.name) == target)
            .map(|sprite| StrategyMatch::new(sprite, EXACT_CONFIDENCE))
    }
}

// ============================================================================
// Normalized
// ============================================================================

/// A variant of the entity name contains, or is contained in, a sprite name
/// on word boundaries. Camel-case breaks in either name count as boundaries.
pub struct NormalizedStrategy {
    /// Sprite names shorter than this never match by being contained in
    /// the entity name.
    pub min_reverse_len: usize,
}

impl NormalizedStrategy {
    /// Lower-cased name as-is, with spaces as underscores, with underscores
    /// as spaces, with both removed, and with camel-case breaks marked.
    pub fn variants(entity_name: &str) -> Vec<String> {
        let trimmed = entity_name.trim();
        let lower = trimmed.to_lowercase();
        let candidates = [
            lower.replace(' ', "_"),
            lower.replace('_', " "),
            lower.replace([' ', '_'], ""),
            split_camel_case(trimmed).to_lowercase(),
        ];

        let mut variants = vec![lower];
        for candidate in candidates {
            if !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
        variants.retain(|v| !v.is_empty());
        variants
    }

    fn matches(&self, variant: &str, sprite_name: &str) -> bool {
        contains_on_boundary(sprite_name, variant)
            || (sprite_name.chars().count() >= self.min_reverse_len
                && contains_on_boundary(variant, sprite_name))
    }
}

impl Default for NormalizedStrategy {
    fn default() -> Self {
        Self { min_reverse_len: 3 }
    }
}

impl MatchStrategy for NormalizedStrategy {
    fn method(&self) -> CorrelationMethod {
        CorrelationMethod::Normalized
    }

    fn attempt<'a>(&self, entity_name: &str, catalog: &'a SpriteCatalog) -> Option<StrategyMatch<'a>> {
        let variants = Self::variants(entity_name);
        catalog
            .iter()
            .find(|sprite| {
                let lower = split_camel_case(sprite.name.trim()).to_lowercase();
                let stripped = normalize_name(&sprite.name);
                variants
                    .iter()
                    .any(|v| self.matches(v, &lower) || self.matches(v, &stripped))
            })
            .map(|sprite| StrategyMatch::new(sprite, NORMALIZED_CONFIDENCE))
    }
}

// ============================================================================
// Fuzzy
// ============================================================================

/// Highest edit-distance similarity at or above a threshold.
pub struct FuzzyStrategy {
    pub threshold: f64,
    pub max_alternates: usize,
}

impl Default for FuzzyStrategy {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            max_alternates: 3,
        }
    }
}

impl MatchStrategy for FuzzyStrategy {
    fn method(&self) -> CorrelationMethod {
        CorrelationMethod::Fuzzy
    }

    fn attempt<'a>(&self, entity_name: &str, catalog: &'a SpriteCatalog) -> Option<StrategyMatch<'a>> {
        let target = normalize_name(entity_name);
        if target.is_empty() {
            return None;
        }

        let mut scored: Vec<(f64, &SpriteMetadata)> = catalog
            .iter()
            .map(|sprite| (similarity(&target, &normalize_name(&sprite.name)), sprite))
            .filter(|(score, _)| *score >= self.threshold)
            .collect();
        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut iter = scored.into_iter();
        let (confidence, best) = iter.next()?;
        let alternates = iter
            .take(self.max_alternates)
            .map(|(_, sprite)| sprite.id.clone())
            .collect();

        Some(StrategyMatch {
            sprite: best,
            confidence,
            alternates,
        })
    }
}

// ============================================================================
// Keyword
// ============================================================================

/// First sprite sharing any significant keyword.
pub struct KeywordStrategy;

impl MatchStrategy for KeywordStrategy {
    fn method(&self) -> CorrelationMethod {
        CorrelationMethod::Keyword
    }

    fn attempt<'a>(&self, entity_name: &str, catalog: &'a SpriteCatalog) -> Option<StrategyMatch<'a>> {
        let wanted = keywords(entity_name);
        if wanted.is_empty() {
            return None;
        }
        catalog
            .iter()
            .find(|sprite| !keywords(&sprite.name).is_disjoint(&wanted))
            .map(|sprite| StrategyMatch::new(sprite, KEYWORD_CONFIDENCE))
    }
}
