//! Relic attributes.

use pegdex_model::{EntityDetails, RelicDetails, RelicRarity};

use super::ExtractContext;

pub const EFFECT_FIELD: &str = "effect";
pub const RARITY_FIELD: &str = "globalRarity";
pub const DESCRIPTION_FIELDS: &[&str] = &["description", "englishDescription"];

pub(super) fn extract(ctx: &ExtractContext<'_>) -> (EntityDetails, String) {
    let effect = ctx
        .fields
        .string(&[EFFECT_FIELD])
        .map(|e| ctx.resolve(&e))
        .unwrap_or_default();

    let rarity_value = ctx.fields.int(&[RARITY_FIELD]).unwrap_or(0);

    let description = ctx
        .translate_keyed("_desc")
        .or_else(|| ctx.fields.string(DESCRIPTION_FIELDS))
        .map(|d| ctx.resolve(&d))
        .unwrap_or_default();

    let details = RelicDetails {
        effect,
        rarity_value,
        rarity: RelicRarity::from_value(rarity_value),
    };
    (EntityDetails::Relic(details), description)
}
