//! Pegdex Sprite Resolution
//!
//! Frame geometry detection for sprite textures and correlation of entities
//! with catalog sprites.
//!
//! - [`SpriteGeometryResolver`] decides whether a texture is a single image
//!   or an atlas of frames.
//! - [`SpriteCorrelator`] links an entity to a catalog sprite through an
//!   ordered cascade of [`MatchStrategy`] stages, backed by a persistent
//!   [`CorrelationStore`].
//!
//! # Example
//!
//! ```
//! use pegdex_model::{CorrelationMethod, EntityKind, SpriteCatalog, SpriteMetadata};
//! use pegdex_sprite::{CorrelationStore, CorrelatorConfig, SpriteCorrelator};
//!
//! let catalog: SpriteCatalog = vec![
//!     SpriteMetadata::single("fire_dragon_01", "fire_dragon_01", EntityKind::Enemy, 64, 64),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut correlator = SpriteCorrelator::new(&CorrelatorConfig::default(), CorrelationStore::new());
//! let c = correlator.correlate("fire_dragon", "Fire Dragon", EntityKind::Enemy, &catalog);
//! assert_eq!(c.method, CorrelationMethod::Normalized);
//! ```

pub mod correlator;
pub mod geometry;
pub mod similarity;
pub mod sink;
pub mod store;
pub mod strategy;

pub use correlator::{default_strategies, CorrelatorConfig, SpriteCorrelator};
pub use geometry::{GeometryConfig, GridLayout, LayoutKind, SpriteGeometryResolver};
pub use similarity::{levenshtein_distance, normalize_name, similarity};
pub use sink::{sprite_path, PathOnlySink, SpriteSink};
pub use store::{CorrelationStore, StoreError, StoreInfo};
pub use strategy::{
    ExactStrategy, FuzzyStrategy, KeywordStrategy, MatchStrategy, NormalizedStrategy, StrategyMatch,
};
