//! Property-based tests for the pegdex pipeline using proptest.
//!
//! These tests check that the pure building blocks (slugs, placeholder
//! substitution, similarity, classification and sprite geometry) never panic
//! and keep their documented guarantees for arbitrary inputs.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pegdex-tests --test proptest_properties
//! ```

use proptest::prelude::*;

use pegdex_extract::classifier::ORB_SIGNATURE;
use pegdex_extract::EntityClassifier;
use pegdex_model::{
    entity_id, resolve_tokens, AssetHandle, EntityKind, LocParams, RawRecord, SpriteHandle,
    SpriteMetadata, SpriteRect,
};
use pegdex_sprite::{levenshtein_distance, similarity, GeometryConfig, SpriteGeometryResolver};

// ============================================================================
// 1. Entity Ids
// ============================================================================

fn asset_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9 _\\-\\[\\]()]{0,40}")
        .unwrap()
        .boxed()
}

proptest! {
    /// Slugging a slug changes nothing.
    #[test]
    fn entity_id_is_idempotent(name in asset_name()) {
        let id = entity_id(&name);
        prop_assert_eq!(entity_id(&id), id);
    }

    /// Slugs carry no spaces, brackets or upper-case letters.
    #[test]
    fn entity_id_is_clean(name in asset_name()) {
        let id = entity_id(&name);
        prop_assert!(
            !id.chars().any(|c| c == ' ' || "[]()".contains(c) || c.is_ascii_uppercase()),
            "Unexpected character in id '{}'", id
        );
    }
}

// ============================================================================
// 2. Placeholder Substitution
// ============================================================================

fn loc_params() -> impl Strategy<Value = LocParams> {
    prop::collection::btree_map("[A-Z]{1,6}", "[a-z0-9{}\\[\\] ]{0,8}", 0..4)
}

proptest! {
    /// Arbitrary text, including unbalanced and multi-byte input, never panics.
    #[test]
    fn resolve_tokens_never_panics(text in "\\PC{0,80}", params in loc_params()) {
        let _ = resolve_tokens(&text, &params);
    }

    /// Text without braces passes through unchanged.
    #[test]
    fn text_without_placeholders_is_unchanged(
        text in "[^{}]{0,60}",
        params in loc_params()
    ) {
        prop_assert_eq!(resolve_tokens(&text, &params), text);
    }

    /// Every known placeholder is replaced by its value.
    #[test]
    fn known_placeholder_is_replaced(
        key in "[A-Z]{1,6}",
        value in "[a-z0-9 ]{0,8}",
        bracketed in any::<bool>()
    ) {
        let params: LocParams = [(key.clone(), value.clone())].into_iter().collect();
        let text = if bracketed {
            format!("Deals {{[{}]}} damage", key)
        } else {
            format!("Deals {{{}}} damage", key)
        };
        prop_assert_eq!(resolve_tokens(&text, &params), format!("Deals {} damage", value));
    }
}

// ============================================================================
// 3. Similarity
// ============================================================================

proptest! {
    /// Similarity is symmetric and bounded.
    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[a-z0-9]{0,20}", b in "[a-z0-9]{0,20}") {
        let ab = similarity(&a, &b);
        prop_assert_eq!(ab, similarity(&b, &a));
        prop_assert!((0.0..=1.0).contains(&ab), "similarity out of range: {}", ab);
    }

    /// A string is fully similar to itself.
    #[test]
    fn similarity_with_self_is_one(a in "[a-z0-9]{0,20}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    /// Edit distance never exceeds the longer length.
    #[test]
    fn distance_is_bounded_by_length(a in "[a-z]{0,20}", b in "[a-z]{0,20}") {
        prop_assert!(levenshtein_distance(&a, &b) <= a.len().max(b.len()));
    }
}

// ============================================================================
// 4. Classification
// ============================================================================

fn orb_record(fields: &[&str]) -> RawRecord {
    fields
        .iter()
        .enumerate()
        .fold(RawRecord::new(), |record, (i, field)| record.with(*field, i as i64 + 1))
}

proptest! {
    /// Four or more orb fields are always an orb.
    #[test]
    fn strong_orb_evidence_classifies_as_orb(
        fields in prop::sample::subsequence(ORB_SIGNATURE.to_vec(), 4..=5)
    ) {
        let classifier = EntityClassifier::new();
        prop_assert_eq!(classifier.classify(&orb_record(&fields)), Some(EntityKind::Orb));
    }

    /// Exactly three orb fields without corroborating evidence are rejected.
    #[test]
    fn borderline_orb_without_evidence_is_rejected(
        fields in prop::sample::subsequence(ORB_SIGNATURE.to_vec(), 3)
    ) {
        let classifier = EntityClassifier::new();
        prop_assert_eq!(classifier.classify(&orb_record(&fields)), None);
    }

    /// The same three fields pass with an attack-shape field.
    #[test]
    fn borderline_orb_with_attack_shape_is_accepted(
        fields in prop::sample::subsequence(ORB_SIGNATURE.to_vec(), 3)
    ) {
        let record = orb_record(&fields).with("targetingType", 1);
        prop_assert_eq!(EntityClassifier::new().classify(&record), Some(EntityKind::Orb));
    }

    /// Ball-physics components never classify as orbs.
    #[test]
    fn pachinko_ball_is_never_an_orb(
        fields in prop::sample::subsequence(ORB_SIGNATURE.to_vec(), 4..=5)
    ) {
        let record = orb_record(&fields)
            .with("_renderer", AssetHandle::new(0, 1))
            .with("FireForce", 12.0)
            .with("GravityScale", 1.0);
        prop_assert_eq!(EntityClassifier::new().classify(&record), None);
    }
}

// ============================================================================
// 5. Sprite Geometry
// ============================================================================

fn sprite_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z_]{1,16}")
        .unwrap()
        .boxed()
}

fn assert_frames_inside(meta: &SpriteMetadata, width: u32, height: u32) -> Result<(), TestCaseError> {
    if meta.is_atlas {
        prop_assert_eq!(meta.frame_count as usize, meta.atlas_frames.len());
    }
    for frame in &meta.atlas_frames {
        prop_assert!(
            frame.x + frame.width <= width && frame.y + frame.height <= height,
            "frame {} ({},{} {}x{}) outside {}x{}",
            frame.name, frame.x, frame.y, frame.width, frame.height, width, height
        );
        prop_assert!(frame.width > 0 && frame.height > 0);
    }
    Ok(())
}

proptest! {
    /// Whole-texture resolution never panics and frames stay in bounds.
    #[test]
    fn texture_frames_fit_inside_texture(
        width in 1u32..=600,
        height in 1u32..=600,
        name in sprite_name()
    ) {
        let resolver = SpriteGeometryResolver::new(GeometryConfig::default());
        let handle = SpriteHandle::texture(AssetHandle::new(0, 1));
        let meta = resolver.resolve(&handle, width, height, &name, EntityKind::Enemy);
        prop_assert_eq!(meta.width, width);
        prop_assert_eq!(meta.height, height);
        assert_frames_inside(&meta, width, height)?;
    }

    /// Sub-rectangle resolution keeps every frame inside the texture.
    #[test]
    fn rect_frames_fit_inside_texture(
        width in 1u32..=512,
        height in 1u32..=512,
        rect in (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0),
        name in sprite_name()
    ) {
        let x = (rect.0 * width as f64) as u32;
        let y = (rect.1 * height as f64) as u32;
        let w = 1 + (rect.2 * (width - x - 1) as f64) as u32;
        let h = 1 + (rect.3 * (height - y - 1) as f64) as u32;

        let resolver = SpriteGeometryResolver::new(GeometryConfig::default());
        let handle = SpriteHandle::sprite(AssetHandle::new(0, 1), SpriteRect::new(x, y, w, h));
        let meta = resolver.resolve(&handle, width, height, &name, EntityKind::Orb);
        assert_frames_inside(&meta, width, height)?;
    }
}
