//! Batch orchestration: classify, extract, resolve sprites, correlate.
//!
//! Each asset is processed in isolation. An asset that cannot be classified
//! or extracted is counted and skipped; it never stops the batch.

use std::collections::BTreeMap;

use pegdex_extract::{is_orb_game_object, EntityClassifier, EntityExtractor, Localizer};
use pegdex_model::{Correlation, CorrelationMethod, EntityKind, EntityRecord, SpriteCatalog, SpriteMetadata};
use pegdex_sprite::{CorrelationStore, SpriteCorrelator, SpriteGeometryResolver, SpriteSink};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::input::{AssetInput, AssetSource, BatchInput, SpriteInput};

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub records_seen: usize,
    pub classified: BTreeMap<EntityKind, usize>,
    pub unclassified: usize,
    pub extraction_failures: usize,
    pub sprites_resolved: usize,
    pub correlations: BTreeMap<CorrelationMethod, usize>,
}

impl BatchReport {
    pub fn classified_total(&self) -> usize {
        self.classified.values().sum()
    }

    pub fn extracted(&self) -> usize {
        self.classified_total() - self.extraction_failures
    }

    fn count_correlation(&mut self, method: CorrelationMethod) {
        *self.correlations.entry(method).or_insert(0) += 1;
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutput {
    pub entities: Vec<EntityRecord>,
    /// Sprites resolved from direct references during the run.
    pub sprites: Vec<SpriteMetadata>,
    pub report: BatchReport,
}

/// The extraction pipeline.
pub struct Pipeline<S: SpriteSink> {
    classifier: EntityClassifier,
    extractor: EntityExtractor,
    geometry: SpriteGeometryResolver,
    correlator: SpriteCorrelator,
    sink: S,
}

impl<S: SpriteSink> Pipeline<S> {
    pub fn new(
        config: &PipelineConfig,
        localizer: impl Localizer + 'static,
        store: CorrelationStore,
        sink: S,
    ) -> Self {
        Self {
            classifier: EntityClassifier::with_order(&config.classification_order),
            extractor: EntityExtractor::new(localizer),
            geometry: SpriteGeometryResolver::new(config.geometry.clone()),
            correlator: SpriteCorrelator::new(&config.correlator, store),
            sink,
        }
    }

    /// Processes every asset of the batch.
    pub fn run(&mut self, batch: &BatchInput) -> BatchOutput {
        let catalogs: BTreeMap<EntityKind, SpriteCatalog> = EntityKind::ALL
            .iter()
            .map(|&kind| (kind, batch.catalog.of_kind(kind)))
            .collect();

        let no_sprites = SpriteCatalog::default();

        let mut output = BatchOutput::default();
        for asset in &batch.assets {
            output.report.records_seen += 1;
            let Some(kind) = self.classify(asset) else {
                debug!(asset = %asset.name, "asset not classified");
                output.report.unclassified += 1;
                continue;
            };
            *output.report.classified.entry(kind).or_insert(0) += 1;

            let Some(mut entity) = self.extract(kind, asset) else {
                output.report.extraction_failures += 1;
                continue;
            };

            let correlation = match &asset.sprite {
                Some(sprite) => {
                    let meta = self.resolve_sprite(kind, sprite);
                    output.report.sprites_resolved += 1;
                    let correlation = self.correlator.record_direct(kind, &entity.id, &meta);
                    output.sprites.push(meta);
                    correlation
                }
                None => {
                    let catalog = catalogs.get(&kind).unwrap_or(&no_sprites);
                    self.correlator.correlate(&entity.id, &entity.name, kind, catalog)
                }
            };

            entity.apply_correlation(&correlation);
            output.report.count_correlation(correlation.method);
            output.entities.push(entity);
        }

        let report = &output.report;
        info!(
            records = report.records_seen,
            extracted = report.extracted(),
            unclassified = report.unclassified,
            failures = report.extraction_failures,
            sprites = report.sprites_resolved,
            "batch complete"
        );
        output
    }

    /// Chooses the entity kind for an asset, or `None` to skip it.
    pub fn classify(&self, asset: &AssetInput) -> Option<EntityKind> {
        match &asset.source {
            AssetSource::GameObject(object) => {
                is_orb_game_object(object).then_some(EntityKind::Orb)
            }
            AssetSource::Record(record) => match asset.kind {
                Some(kind) => self.classifier.classify_as(kind, record).then_some(kind),
                None => self.classifier.classify(record),
            },
        }
    }

    fn extract(&self, kind: EntityKind, asset: &AssetInput) -> Option<EntityRecord> {
        let params = asset.loc_params.as_ref();
        match &asset.source {
            AssetSource::GameObject(object) => self.extractor.extract_game_object(object, params),
            AssetSource::Record(record) => self.extractor.extract(kind, &asset.name, record, params),
        }
    }

    fn resolve_sprite(&mut self, kind: EntityKind, sprite: &SpriteInput) -> SpriteMetadata {
        let mut meta = self
            .geometry
            .resolve(&sprite.handle, sprite.width, sprite.height, &sprite.name, kind);
        match self.sink.export(&sprite.handle, &meta) {
            Ok(path) => meta.file_path = Some(path),
            Err(err) => warn!(sprite = %sprite.name, error = %err, "sprite export failed"),
        }
        meta
    }

    /// Correlation store with every outcome of this run merged in.
    pub fn store(&self) -> &CorrelationStore {
        self.correlator.store()
    }

    pub fn into_store(self) -> CorrelationStore {
        self.correlator.into_store()
    }
}

/// Looks up the stored correlation for an entity.
pub fn stored_correlation<'a>(store: &'a CorrelationStore, entity: &EntityRecord) -> Option<&'a Correlation> {
    store.get(&entity.cache_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegdex_extract::{LocalizationTable, NoLocalization};
    use pegdex_model::{AssetHandle, ComponentRecord, GameObject, RawRecord, SpriteHandle, SpriteRect};
    use pegdex_sprite::PathOnlySink;
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline<PathOnlySink> {
        Pipeline::new(&PipelineConfig::default(), NoLocalization, CorrelationStore::new(), PathOnlySink)
    }

    fn orbelisk() -> AssetInput {
        AssetInput::record(
            "Orbelisk",
            RawRecord::new()
                .with("locKey", "orbelisk")
                .with("englishDisplayName", "Orbelisk")
                .with("effect", "12")
                .with("globalRarity", "1")
                .with("sprite", AssetHandle::new(0, 99)),
        )
    }

    fn slime() -> AssetInput {
        AssetInput::record(
            "Slime",
            RawRecord::new().with("MaxHealth", 30).with("DamagePerMeleeAttack", 2),
        )
    }

    #[test]
    fn test_classify_respects_hint() {
        let p = pipeline();
        assert_eq!(p.classify(&orbelisk()), Some(EntityKind::Relic));
        assert_eq!(p.classify(&orbelisk().with_kind(EntityKind::Relic)), Some(EntityKind::Relic));
        assert_eq!(p.classify(&orbelisk().with_kind(EntityKind::Orb)), None);
    }

    #[test]
    fn test_game_object_needs_component_evidence() {
        let p = pipeline();
        let bare = AssetInput::game_object(GameObject::new("StoneOrb-Lvl1"));
        assert_eq!(p.classify(&bare), None);

        let with_component = AssetInput::game_object(
            GameObject::new("StoneOrb-Lvl1").with_component(ComponentRecord::new("OrbComponent", RawRecord::new())),
        );
        assert_eq!(p.classify(&with_component), Some(EntityKind::Orb));
    }

    #[test]
    fn test_run_with_direct_sprite_and_catalog() {
        let handle = SpriteHandle::sprite(AssetHandle::new(0, 99), SpriteRect::new(0, 0, 64, 64));
        let batch = BatchInput {
            assets: vec![
                orbelisk().with_sprite(SpriteInput {
                    handle,
                    width: 64,
                    height: 64,
                    name: "Relic_Orbelisk".to_string(),
                }),
                slime(),
                AssetInput::record("Empty", RawRecord::new().with("unrelated", 1)),
            ],
            catalog: vec![SpriteMetadata::single("slime_idle", "slime", EntityKind::Enemy, 32, 32)
                .with_file_path("sprites/enemies/slime_idle.png")]
            .into_iter()
            .collect(),
        };

        let mut p = pipeline();
        let output = p.run(&batch);

        assert_eq!(output.report.records_seen, 3);
        assert_eq!(output.report.unclassified, 1);
        assert_eq!(output.report.classified_total(), 2);
        assert_eq!(output.report.sprites_resolved, 1);
        assert_eq!(output.report.correlations.get(&CorrelationMethod::Exact), Some(&2));

        let relic = &output.entities[0];
        assert_eq!(relic.sprite_id.as_deref(), Some("relic_orbelisk"));
        assert_eq!(relic.sprite_file_path.as_deref(), Some("sprites/relics/relic_orbelisk.png"));
        assert_eq!(relic.correlation_confidence, 1.0);
        assert_eq!(output.sprites[0].file_path.as_deref(), Some("sprites/relics/relic_orbelisk.png"));

        let slime = &output.entities[1];
        assert_eq!(slime.sprite_id.as_deref(), Some("slime_idle"));
        assert_eq!(slime.sprite_file_path.as_deref(), Some("sprites/enemies/slime_idle.png"));

        let store = p.into_store();
        assert_eq!(store.len(), 2);
        assert!(stored_correlation(&store, relic).is_some());
    }

    #[test]
    fn test_catalog_is_filtered_by_kind() {
        // Same name, wrong kind: must not match.
        let batch = BatchInput {
            assets: vec![slime()],
            catalog: vec![SpriteMetadata::single("slime", "slime", EntityKind::Orb, 32, 32)]
                .into_iter()
                .collect(),
        };
        let output = pipeline().run(&batch);
        assert_eq!(output.entities[0].correlation_method, Some(CorrelationMethod::NoMatch));
        assert!(!output.entities[0].has_sprite());
    }

    #[test]
    fn test_unusable_asset_name_is_still_extracted() {
        // The asset name slugs to nothing; the id comes from the entity name.
        let mut asset = orbelisk();
        asset.name = "()".to_string();
        let table = LocalizationTable::new();
        let mut p = Pipeline::new(&PipelineConfig::default(), table, CorrelationStore::new(), PathOnlySink);

        let output = p.run(&BatchInput {
            assets: vec![asset],
            catalog: SpriteCatalog::default(),
        });
        assert_eq!(output.report.extraction_failures, 0);
        assert_eq!(output.report.extracted(), 1);
        assert_eq!(output.entities[0].id, "orbelisk");
        assert!(p.store().get("Relic:orbelisk").is_some());
    }
}
