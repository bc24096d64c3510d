//! Entity classification by field-signature voting.
//!
//! Each entity kind has a signature: a set of field names whose presence is
//! evidence for that kind, plus a threshold. Signatures are tried in a fixed
//! order (Relic, Enemy, Orb) and the first match wins. A record that matches
//! nothing is not an error; it simply is not an entity.

use std::collections::BTreeSet;

use pegdex_model::{EntityKind, GameObject, RawRecord, RawValue};
use tracing::debug;

// ============================================================================
// Signature Tables
// ============================================================================

/// Fields indicative of a relic.
pub const RELIC_SIGNATURE: &[&str] = &["locKey", "englishDisplayName", "effect", "globalRarity", "sprite"];

/// Minimum relic signature fields for a match.
pub const RELIC_MIN_FIELDS: usize = 3;

/// Fields indicative of an enemy.
pub const ENEMY_SIGNATURE: &[&str] = &[
    "CurrentHealth",
    "StartingHealth",
    "DamagePerMeleeAttack",
    "AttackRange",
    "enemyTypes",
    "MaxHealth",
    "MaxHealthCruciball",
    "MeleeAttackDamage",
    "RangedAttackDamage",
    "location",
    "Type",
];

/// Minimum enemy signature score for a match.
pub const ENEMY_MIN_FIELDS: usize = 2;

/// Localization path field scanned for enemy keywords.
pub const ENEMY_LOC_KEY_FIELD: &str = "LocKey";

/// Keywords in `LocKey` that mark an enemy.
pub const ENEMY_LOC_KEYWORDS: &[&str] = &[
    "enemy", "boss", "slime", "ballista", "dragon", "demon", "sapper", "knight", "archer",
];

/// Score added when `LocKey` contains an enemy keyword.
pub const ENEMY_KEYWORD_BONUS: usize = 2;

/// Fields indicative of an orb.
pub const ORB_SIGNATURE: &[&str] = &["locNameString", "locName", "DamagePerPeg", "CritDamagePerPeg", "Level"];

/// Below this many orb fields the record is rejected.
pub const ORB_MIN_FIELDS: usize = 3;

/// At or above this many orb fields the record is accepted outright.
pub const ORB_STRONG_FIELDS: usize = 4;

/// Attack-shape fields that corroborate a borderline orb.
pub const ORB_ATTACK_SHAPE_FIELDS: &[&str] = &[
    "shotPrefab",
    "_shotPrefab",
    "_thunderPrefab",
    "_criticalShotPrefab",
    "_criticalThunderPrefab",
    "targetColumn",
    "verticalAttack",
    "targetingType",
];

/// Script reference field that corroborates a borderline orb.
pub const SCRIPT_FIELD: &str = "m_Script";

/// Renderer field required on ball-physics components.
pub const PACHINKO_RENDERER_FIELD: &str = "_renderer";

/// Fields of a ball-physics component (the renderer counts toward the total).
pub const PACHINKO_BALL_FIELDS: &[&str] = &[
    "_renderer",
    "FireForce",
    "GravityScale",
    "MaxBounceCount",
    "MultiballForceMod",
];

/// Minimum ball-physics fields, renderer included.
pub const PACHINKO_MIN_FIELDS: usize = 3;

/// Name fragments that rule a game object out as an orb.
pub const GAME_OBJECT_EXCLUSION_KEYWORDS: &[&str] = &[
    "ui", "canvas", "text", "button", "panel", "scroll", "image", "background", "camera", "light",
];

/// Component type fragments that identify an orb game object.
pub const ORB_COMPONENT_TYPES: &[&str] = &["OrbComponent", "AttackComponent", "PachinkoBallComponent"];

/// Nested key holding orb component data.
pub const ORB_COMPONENT_KEY: &str = "OrbComponent";

/// Nested key holding per-component data.
pub const COMPONENT_DATA_KEY: &str = "ComponentData";

/// Nesting depth searched for orb fields inside game object components.
const NESTED_FIELD_DEPTH: usize = 3;

// ============================================================================
// Signatures
// ============================================================================

/// Field-signature test for one entity kind.
pub trait KindSignature: Send + Sync {
    /// Kind this signature identifies.
    fn kind(&self) -> EntityKind;

    /// Returns true if `record` carries enough evidence for this kind.
    fn matches(&self, record: &RawRecord) -> bool;
}

/// Relic: at least 3 of the 5 relic fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelicSignature;

impl KindSignature for RelicSignature {
    fn kind(&self) -> EntityKind {
        EntityKind::Relic
    }

    fn matches(&self, record: &RawRecord) -> bool {
        record.count_present(RELIC_SIGNATURE) >= RELIC_MIN_FIELDS
    }
}

/// Enemy: at least 2 enemy fields, with a bonus for enemy-like `LocKey` paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemySignature;

impl EnemySignature {
    /// Computes the vote count including the keyword bonus.
    pub fn score(record: &RawRecord) -> usize {
        let mut score = record.count_present(ENEMY_SIGNATURE);
        if let Some(loc_key) = record.str_field(ENEMY_LOC_KEY_FIELD) {
            let loc_key = loc_key.to_lowercase();
            if ENEMY_LOC_KEYWORDS.iter().any(|k| loc_key.contains(k)) {
                score += ENEMY_KEYWORD_BONUS;
            }
        }
        score
    }
}

impl KindSignature for EnemySignature {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn matches(&self, record: &RawRecord) -> bool {
        Self::score(record) >= ENEMY_MIN_FIELDS
    }
}

/// Orb: 4+ fields outright, exactly 3 only with attack-shape or script evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbSignature;

impl KindSignature for OrbSignature {
    fn kind(&self) -> EntityKind {
        EntityKind::Orb
    }

    fn matches(&self, record: &RawRecord) -> bool {
        let count = record.count_present(ORB_SIGNATURE);
        if count < ORB_MIN_FIELDS {
            return false;
        }
        if count >= ORB_STRONG_FIELDS {
            return true;
        }
        record.has_any(ORB_ATTACK_SHAPE_FIELDS) || record.contains(SCRIPT_FIELD)
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Decides which entity kind, if any, a raw record represents.
pub struct EntityClassifier {
    signatures: Vec<Box<dyn KindSignature>>,
}

impl EntityClassifier {
    /// Creates a classifier with the default order: Relic, Enemy, Orb.
    pub fn new() -> Self {
        Self::with_order(&EntityKind::ALL)
    }

    /// Creates a classifier that tries kinds in the given order.
    pub fn with_order(order: &[EntityKind]) -> Self {
        Self {
            signatures: order.iter().map(|&k| signature_for(k)).collect(),
        }
    }

    /// Returns the first kind whose signature matches.
    ///
    /// Ball-physics components are never classified as orbs.
    pub fn classify(&self, record: &RawRecord) -> Option<EntityKind> {
        let pachinko = is_pachinko_ball_data(record);
        for signature in &self.signatures {
            if signature.kind() == EntityKind::Orb && pachinko {
                debug!("skipping orb signature for ball-physics component");
                continue;
            }
            if signature.matches(record) {
                return Some(signature.kind());
            }
        }
        None
    }

    /// Tests a single, caller-chosen kind.
    pub fn classify_as(&self, kind: EntityKind, record: &RawRecord) -> bool {
        signature_for(kind).matches(record)
    }

    /// Order in which kinds are tried.
    pub fn order(&self) -> Vec<EntityKind> {
        self.signatures.iter().map(|s| s.kind()).collect()
    }
}

impl Default for EntityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn signature_for(kind: EntityKind) -> Box<dyn KindSignature> {
    match kind {
        EntityKind::Relic => Box::new(RelicSignature),
        EntityKind::Enemy => Box::new(EnemySignature),
        EntityKind::Orb => Box::new(OrbSignature),
    }
}

/// Returns true if `record` is a ball-physics component rather than orb data.
///
/// Requires the renderer field plus enough physics fields (renderer included).
pub fn is_pachinko_ball_data(record: &RawRecord) -> bool {
    record.contains(PACHINKO_RENDERER_FIELD)
        && record.count_present(PACHINKO_BALL_FIELDS) >= PACHINKO_MIN_FIELDS
}

/// Decides whether a composed game object is an orb.
///
/// The name alone is never sufficient: component evidence is required.
pub fn is_orb_game_object(object: &GameObject) -> bool {
    let name = object.name.to_lowercase();
    if let Some(keyword) = GAME_OBJECT_EXCLUSION_KEYWORDS
        .iter()
        .find(|k| name.contains(*k))
    {
        debug!(object = %object.name, keyword = *keyword, "game object excluded by name");
        return false;
    }

    for component in &object.components {
        if has_orb_component(&component.data) {
            return true;
        }
        if nested_field_names(&component.data, ORB_SIGNATURE).len() >= ORB_MIN_FIELDS {
            return true;
        }
        if ORB_COMPONENT_TYPES
            .iter()
            .any(|t| component.type_name.contains(t))
        {
            return true;
        }
    }

    false
}

/// True if the data exposes `OrbComponent` directly or under `ComponentData`.
fn has_orb_component(data: &RawRecord) -> bool {
    data.contains(ORB_COMPONENT_KEY)
        || data
            .get_path(&[COMPONENT_DATA_KEY, ORB_COMPONENT_KEY])
            .is_some()
}

/// Collects which of `names` appear anywhere in `record` or its nested records.
fn nested_field_names<'a>(record: &RawRecord, names: &[&'a str]) -> BTreeSet<&'a str> {
    let mut found = BTreeSet::new();
    collect_field_names(record, names, NESTED_FIELD_DEPTH, &mut found);
    found
}

fn collect_field_names<'a>(
    record: &RawRecord,
    names: &[&'a str],
    depth: usize,
    found: &mut BTreeSet<&'a str>,
) {
    for &name in names {
        if record.contains(name) {
            found.insert(name);
        }
    }
    if depth == 0 {
        return;
    }
    for (_, value) in record.iter() {
        if let RawValue::Record(nested) = value {
            collect_field_names(nested, names, depth - 1, found);
        }
    }
}
