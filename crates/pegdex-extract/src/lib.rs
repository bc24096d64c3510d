//! Pegdex Entity Extraction
//!
//! Turns raw asset records into typed entities in two steps: the
//! [`EntityClassifier`] decides which kind of entity a record describes from
//! its field signature, and the [`EntityExtractor`] builds a typed
//! [`EntityRecord`](pegdex_model::EntityRecord) from it, resolving display
//! text through a [`Localizer`].
//!
//! # Example
//!
//! ```
//! use pegdex_extract::{EntityClassifier, EntityExtractor, NoLocalization};
//! use pegdex_model::{EntityKind, RawRecord};
//!
//! let record = RawRecord::new()
//!     .with("locKey", "orbelisk")
//!     .with("englishDisplayName", "Orbelisk")
//!     .with("effect", "12")
//!     .with("globalRarity", "1");
//!
//! let kind = EntityClassifier::new().classify(&record);
//! assert_eq!(kind, Some(EntityKind::Relic));
//!
//! let entity = EntityExtractor::new(NoLocalization)
//!     .extract(EntityKind::Relic, "Orbelisk", &record, None)
//!     .unwrap();
//! assert_eq!(entity.id, "orbelisk");
//! ```

pub mod classifier;
pub mod error;
pub mod extractor;
pub mod localization;

pub use classifier::{
    is_orb_game_object, is_pachinko_ball_data, EnemySignature, EntityClassifier, KindSignature,
    OrbSignature, RelicSignature,
};
pub use error::ExtractError;
pub use extractor::EntityExtractor;
pub use localization::{LocalizationError, LocalizationTable, Localizer, NoLocalization};
