//! Enemy attributes.

use pegdex_model::{EnemyDetails, EntityDetails, RawValue};

use super::{ExtractContext, LOC_PATH_FIELD};

/// Health fields, most authoritative first.
pub const HEALTH_FIELDS: &[&str] = &["MaxHealth", "StartingHealth", "CurrentHealth"];

/// Attack damage fields, most authoritative first.
pub const ATTACK_FIELDS: &[&str] = &["MeleeAttackDamage", "DamagePerMeleeAttack", "RangedAttackDamage"];

pub const CRUCIBALL_HEALTH_FIELD: &str = "MaxHealthCruciball";
pub const LOCATION_FIELD: &str = "location";
pub const TYPE_FIELD: &str = "Type";
pub const DESCRIPTION_FIELDS: &[&str] = &["description", "enemyDescription"];

/// Location names by enum value.
pub const LOCATIONS: &[&str] = &["FOREST", "CASTLE", "MINES", "CORE"];

pub(super) fn extract(ctx: &ExtractContext<'_>) -> (EntityDetails, String) {
    let details = EnemyDetails {
        health: ctx.fields.number(HEALTH_FIELDS).unwrap_or(0.0),
        attack_damage: ctx.fields.number(ATTACK_FIELDS).unwrap_or(0.0),
        location: ctx.fields.get(LOCATION_FIELD).map(location_name).unwrap_or_default(),
        max_health_cruciball: ctx.fields.number(&[CRUCIBALL_HEALTH_FIELD]),
        enemy_type: ctx.fields.string(&[TYPE_FIELD]),
    };

    let description = ctx
        .translate_keyed("_desc")
        .or_else(|| {
            ctx.fields
                .string(&[LOC_PATH_FIELD])
                .and_then(|path| ctx.translate(&format!("{}_desc", path)))
        })
        .or_else(|| ctx.fields.string(DESCRIPTION_FIELDS))
        .map(|d| ctx.resolve(&d))
        .unwrap_or_default();

    (EntityDetails::Enemy(details), description)
}

/// Maps the location field to a name: strings are upper-cased, integers
/// index [`LOCATIONS`].
fn location_name(value: &RawValue) -> String {
    match value {
        RawValue::String(s) => s.trim().to_uppercase(),
        RawValue::Int(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| LOCATIONS.get(i))
            .map_or_else(|| "UNKNOWN".to_string(), |s| s.to_string()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_name() {
        assert_eq!(location_name(&RawValue::from("castle")), "CASTLE");
        assert_eq!(location_name(&RawValue::Int(2)), "MINES");
        assert_eq!(location_name(&RawValue::Int(9)), "UNKNOWN");
        assert_eq!(location_name(&RawValue::Int(-1)), "UNKNOWN");
        assert_eq!(location_name(&RawValue::Bool(true)), "");
    }
}
