//! Orb attributes.

use std::sync::OnceLock;

use pegdex_model::{coerce, EntityDetails, OrbDetails, OrbType};
use regex::Regex;

use super::ExtractContext;

pub const DAMAGE_FIELD: &str = "DamagePerPeg";
pub const CRIT_DAMAGE_FIELD: &str = "CritDamagePerPeg";
pub const LEVEL_FIELD: &str = "Level";
pub const DESCRIPTION_STRINGS_FIELD: &str = "locDescStrings";

/// Level assumed when neither the record nor the asset name carries one.
pub const DEFAULT_LEVEL: i64 = 1;

/// Asset-name keywords for orb type inference, checked in order.
pub const UTILITY_KEYWORDS: &[&str] = &["heal", "support"];
pub const SPECIAL_KEYWORDS: &[&str] = &["special", "unique"];
pub const ATTACK_KEYWORDS: &[&str] = &["attack", "damage"];

static LEVEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn level_regex() -> &'static Regex {
    LEVEL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(?:lvl|level)[\s_\-]*(\d+)").expect("invalid regex pattern")
    })
}

pub(super) fn extract(ctx: &ExtractContext<'_>) -> (EntityDetails, String) {
    let level = ctx
        .fields
        .int(&[LEVEL_FIELD])
        .or_else(|| level_from_name(ctx.asset_name))
        .unwrap_or(DEFAULT_LEVEL);

    // Lines are resolved one by one; the joined text is not resolved again.
    let description_strings = description_strings(ctx);
    let description = if description_strings.is_empty() {
        ctx.translate_keyed("_desc")
            .map(|d| ctx.resolve(&d))
            .unwrap_or_default()
    } else {
        description_strings.join("\n")
    };

    let details = OrbDetails {
        damage_per_peg: ctx.fields.number(&[DAMAGE_FIELD]).unwrap_or(0.0),
        crit_damage_per_peg: ctx.fields.number(&[CRIT_DAMAGE_FIELD]).unwrap_or(0.0),
        level,
        orb_type: infer_orb_type(ctx.asset_name, ctx.fields.contains(DAMAGE_FIELD)),
        description_strings,
    };
    (EntityDetails::Orb(details), description)
}

/// Translates each `locDescStrings` key via `"Orbs/{key}"`, dropping keys
/// without a translation.
fn description_strings(ctx: &ExtractContext<'_>) -> Vec<String> {
    let Some(keys) = ctx.fields.list(DESCRIPTION_STRINGS_FIELD) else {
        return Vec::new();
    };

    keys.iter()
        .filter_map(coerce::to_non_empty_string)
        .filter_map(|key| ctx.translate(&format!("{}/{}", ctx.kind.namespace(), key)))
        .map(|text| ctx.resolve(&text))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Infers the orb role from its asset name.
pub fn infer_orb_type(asset_name: &str, has_damage_field: bool) -> OrbType {
    let name = asset_name.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));

    match () {
        _ if has(UTILITY_KEYWORDS) => OrbType::Utility,
        _ if has(SPECIAL_KEYWORDS) => OrbType::Special,
        _ if has(ATTACK_KEYWORDS) || has_damage_field => OrbType::Attack,
        _ => OrbType::Attack,
    }
}

/// Parses a level suffix such as `-Lvl2` or `level_3` from an asset name.
pub fn level_from_name(asset_name: &str) -> Option<i64> {
    level_regex()
        .captures(asset_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_orb_type() {
        assert_eq!(infer_orb_type("HealOrb", false), OrbType::Utility);
        assert_eq!(infer_orb_type("SupportBall", true), OrbType::Utility);
        assert_eq!(infer_orb_type("UniqueOrb", true), OrbType::Special);
        assert_eq!(infer_orb_type("AttackOrb", false), OrbType::Attack);
        assert_eq!(infer_orb_type("Stone", true), OrbType::Attack);
        assert_eq!(infer_orb_type("Stone", false), OrbType::Attack);
    }

    #[test]
    fn test_level_from_name() {
        assert_eq!(level_from_name("StoneOrb-Lvl2"), Some(2));
        assert_eq!(level_from_name("daggorb_level_3"), Some(3));
        assert_eq!(level_from_name("LVL 10"), Some(10));
        assert_eq!(level_from_name("Stone"), None);
    }
}
