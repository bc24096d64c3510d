//! Pegdex Data Model
//!
//! Types shared by every stage of the extraction pipeline: the loosely typed
//! records recovered from the game's asset store, the typed entities built
//! from them, sprite metadata, and entity-to-sprite correlations.
//!
//! # Example
//!
//! ```
//! use pegdex_model::{coerce, RawRecord, RawValue};
//!
//! let record = RawRecord::new()
//!     .with("Level", 2.0)
//!     .with("DamagePerPeg", "1.5");
//!
//! assert_eq!(coerce::to_int(record.get("Level").unwrap()), Some(2));
//! assert_eq!(coerce::to_float(record.get("DamagePerPeg").unwrap()), Some(1.5));
//! assert!(matches!(record.get("Missing"), None | Some(RawValue::Null)));
//! ```
//!
//! # Modules
//!
//! - [`value`]: `RawValue` tagged union, `RawRecord`, game objects
//! - [`coerce`]: Safe value conversions
//! - [`tokens`]: Localization placeholder substitution
//! - [`sanitize`]: Diagnostic flattening of raw records
//! - [`slug`]: Entity id derivation
//! - [`entity`]: Typed entities
//! - [`sprite`]: Sprite metadata and catalog
//! - [`correlation`]: Entity to sprite links

pub mod coerce;
pub mod correlation;
pub mod entity;
pub mod sanitize;
pub mod slug;
pub mod sprite;
pub mod tokens;
pub mod value;

// Re-export commonly used types at the crate root
pub use correlation::{Correlation, CorrelationMethod};
pub use entity::{
    EnemyDetails, EntityDetails, EntityKind, EntityRecord, OrbDetails, OrbType, RelicDetails,
    RelicRarity,
};
pub use sanitize::{sanitize_record, RawData};
pub use slug::entity_id;
pub use sprite::{SpriteCatalog, SpriteFrame, SpriteHandle, SpriteMetadata, SpriteRect};
pub use tokens::{resolve_tokens, LocParams};
pub use value::{AssetHandle, ComponentRecord, GameObject, RawRecord, RawValue};
