//! Typed entity extraction from classified raw records.
//!
//! Extraction never fails the batch: any error for one asset is logged and
//! the asset is dropped. Missing or oddly-typed fields degrade to defaults.

mod enemy;
mod fields;
mod orb;
mod relic;

use pegdex_model::tokens::resolve_opt;
use pegdex_model::{
    entity_id, sanitize_record, EntityKind, EntityRecord, GameObject, LocParams, RawRecord,
};
use tracing::{debug, warn};

use crate::classifier::{COMPONENT_DATA_KEY, ORB_COMPONENT_KEY};
use crate::error::ExtractError;
use crate::localization::Localizer;
use fields::Fields;

pub use orb::{infer_orb_type, level_from_name};

/// Raw display-name fields, in priority order.
pub const DISPLAY_NAME_FIELDS: &[&str] = &["englishDisplayName", "EnglishDisplayName", "enemyName"];

/// Full localization path field (e.g. `"Enemies/Forest/Slime"`).
pub const LOC_PATH_FIELD: &str = "LocKey";

/// Game object name field in records built from game objects.
pub const OBJECT_NAME_FIELD: &str = "m_Name";

/// Localization key fields per kind, in priority order.
pub fn loc_key_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Relic | EntityKind::Enemy => &["locKey"],
        EntityKind::Orb => &["locNameString", "locName", "locKey"],
    }
}

/// Per-asset state shared by the kind-specific builders.
pub(crate) struct ExtractContext<'a> {
    pub kind: EntityKind,
    pub asset_name: &'a str,
    pub fields: Fields<'a>,
    localizer: &'a dyn Localizer,
    params: Option<&'a LocParams>,
}

impl<'a> ExtractContext<'a> {
    pub fn translate(&self, key: &str) -> Option<String> {
        self.localizer.translate(key)
    }

    /// Translates `"{Namespace}/{locKey}{suffix}"` using this kind's key fields.
    pub fn translate_keyed(&self, suffix: &str) -> Option<String> {
        let key = self.fields.string(loc_key_fields(self.kind))?;
        self.translate(&format!("{}/{}{}", self.kind.namespace(), key, suffix))
    }

    /// Substitutes localization placeholders. Each builder applies this once
    /// to its own description text.
    pub fn resolve(&self, text: &str) -> String {
        resolve_opt(text, self.params)
    }
}

/// Builds typed entities from classified records.
pub struct EntityExtractor {
    localizer: Box<dyn Localizer>,
}

impl EntityExtractor {
    pub fn new(localizer: impl Localizer + 'static) -> Self {
        Self {
            localizer: Box::new(localizer),
        }
    }

    /// Extracts an entity, logging and returning `None` on failure.
    pub fn extract(
        &self,
        kind: EntityKind,
        asset_name: &str,
        record: &RawRecord,
        params: Option<&LocParams>,
    ) -> Option<EntityRecord> {
        match self.try_extract(kind, asset_name, record, params) {
            Ok(entity) => {
                debug!(kind = %kind, id = %entity.id, name = %entity.name, "extracted entity");
                Some(entity)
            }
            Err(err) => {
                warn!(kind = %kind, asset = asset_name, error = %err, "entity extraction failed");
                None
            }
        }
    }

    /// Extracts an orb from a composed game object.
    pub fn extract_game_object(
        &self,
        object: &GameObject,
        params: Option<&LocParams>,
    ) -> Option<EntityRecord> {
        let record = game_object_record(object);
        self.extract(EntityKind::Orb, &object.name, &record, params)
    }

    /// Extracts an entity, surfacing the failure reason.
    pub fn try_extract(
        &self,
        kind: EntityKind,
        asset_name: &str,
        record: &RawRecord,
        params: Option<&LocParams>,
    ) -> Result<EntityRecord, ExtractError> {
        if record.is_empty() {
            return Err(ExtractError::EmptyRecord {
                kind,
                asset: asset_name.to_string(),
            });
        }

        let fields = match kind {
            EntityKind::Orb => Fields::with_components(record),
            _ => Fields::top(record),
        };
        let ctx = ExtractContext {
            kind,
            asset_name,
            fields,
            localizer: self.localizer.as_ref(),
            params,
        };

        let name = resolve_name(&ctx);
        let id = resolve_id(kind, asset_name, &name);
        let (details, description) = match kind {
            EntityKind::Relic => relic::extract(&ctx),
            EntityKind::Enemy => enemy::extract(&ctx),
            EntityKind::Orb => orb::extract(&ctx),
        };

        let mut entity = EntityRecord::new(id, name, details);
        entity.description = description;
        entity.raw_data = sanitize_record(record);
        Ok(entity)
    }
}

/// Name resolution, first non-empty wins:
/// namespaced translation, raw display name, `LocKey` translation, asset
/// name (when it slugs to a non-empty id), then `"Unknown {Kind}"`.
fn resolve_name(ctx: &ExtractContext<'_>) -> String {
    if let Some(name) = ctx.translate_keyed("_name") {
        return name;
    }
    if let Some(name) = ctx.fields.string(DISPLAY_NAME_FIELDS) {
        return name;
    }
    if let Some(name) = ctx
        .fields
        .string(&[LOC_PATH_FIELD])
        .and_then(|path| ctx.translate(&path))
    {
        return name;
    }
    let asset_name = ctx.asset_name.trim();
    if !entity_id(asset_name).is_empty() {
        return asset_name.to_string();
    }
    format!("Unknown {}", ctx.kind)
}

/// Slug of the asset name, or of the resolved name when the asset name has
/// no usable characters.
fn resolve_id(kind: EntityKind, asset_name: &str, name: &str) -> String {
    let id = entity_id(asset_name);
    if !id.is_empty() {
        return id;
    }
    debug!(kind = %kind, asset = asset_name, name, "asset name yields no id, using entity name");
    let id = entity_id(name);
    if id.is_empty() {
        entity_id(&format!("Unknown {}", kind))
    } else {
        id
    }
}

/// Flattens a game object into a record with its components under
/// `ComponentData`, keyed by component type. Orb data found nested inside
/// any component is hoisted to `ComponentData.OrbComponent`.
fn game_object_record(object: &GameObject) -> RawRecord {
    let mut components = RawRecord::new();
    for component in &object.components {
        let orb = component
            .data
            .get(ORB_COMPONENT_KEY)
            .or_else(|| component.data.get_path(&[COMPONENT_DATA_KEY, ORB_COMPONENT_KEY]));
        if let Some(orb) = orb {
            if !components.contains(ORB_COMPONENT_KEY) {
                components.insert(ORB_COMPONENT_KEY, orb.clone());
            }
        }
        if !components.contains(&component.type_name) {
            components.insert(component.type_name.clone(), component.data.clone());
        }
    }

    RawRecord::new()
        .with(OBJECT_NAME_FIELD, object.name.clone())
        .with(COMPONENT_DATA_KEY, components)
}
