//! Error types for entity extraction.

use pegdex_model::EntityKind;
use thiserror::Error;

/// Errors that abort extraction of a single asset.
///
/// These never escape the batch: [`crate::EntityExtractor::extract`] logs
/// them and yields `None` for the asset.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The record has no fields at all.
    #[error("{kind} record for '{asset}' has no fields")]
    EmptyRecord {
        /// Requested entity kind.
        kind: EntityKind,
        /// Asset name.
        asset: String,
    },
}
