//! Sprite metadata and the sprite catalog.

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::value::AssetHandle;

/// Pixel rectangle inside a texture. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if this rect is exactly the full `width x height` texture.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }

    /// Returns true if this rect is strictly smaller than the texture in
    /// at least one dimension.
    pub fn is_smaller_than(&self, width: u32, height: u32) -> bool {
        self.width < width || self.height < height
    }
}

/// Texture or sprite handle as supplied by the bundle walker.
///
/// A `Sprite` object carries an intrinsic sub-rect into its texture; a bare
/// `Texture2D` does not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteHandle {
    pub asset: AssetHandle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<SpriteRect>,
}

impl SpriteHandle {
    /// Handle to a bare texture with no sub-rect.
    pub fn texture(asset: AssetHandle) -> Self {
        Self { asset, rect: None }
    }

    /// Handle to a sprite cut from a texture.
    pub fn sprite(asset: AssetHandle, rect: SpriteRect) -> Self {
        Self {
            asset,
            rect: Some(rect),
        }
    }
}

/// One frame inside an atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pivot_x: f32,
    pub pivot_y: f32,
}

impl SpriteFrame {
    /// Creates a frame with a centered pivot.
    pub fn centered(name: impl Into<String>, rect: SpriteRect) -> Self {
        Self {
            name: name.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            pivot_x: 0.5,
            pivot_y: 0.5,
        }
    }
}

/// Geometry and identity of one sprite asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteMetadata {
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub sprite_type: EntityKind,

    /// Exported bitmap location, relative to the output root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Texture width in pixels.
    pub width: u32,

    /// Texture height in pixels.
    pub height: u32,

    pub is_atlas: bool,

    pub frame_width: u32,

    pub frame_height: u32,

    pub frame_count: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atlas_frames: Vec<SpriteFrame>,
}

impl SpriteMetadata {
    /// Single-frame metadata covering the whole texture.
    pub fn single(
        id: impl Into<String>,
        name: impl Into<String>,
        sprite_type: EntityKind,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sprite_type,
            file_path: None,
            width,
            height,
            is_atlas: false,
            frame_width: width,
            frame_height: height,
            frame_count: 1,
            atlas_frames: Vec::new(),
        }
    }

    /// Builder method to set the exported file path.
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Read-only list of known sprites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteCatalog {
    sprites: Vec<SpriteMetadata>,
}

impl SpriteCatalog {
    pub fn new(sprites: Vec<SpriteMetadata>) -> Self {
        Self { sprites }
    }

    /// Returns a catalog restricted to sprites of `kind`.
    pub fn of_kind(&self, kind: EntityKind) -> SpriteCatalog {
        SpriteCatalog {
            sprites: self
                .sprites
                .iter()
                .filter(|s| s.sprite_type == kind)
                .cloned()
                .collect(),
        }
    }

    pub fn find(&self, sprite_id: &str) -> Option<&SpriteMetadata> {
        self.sprites.iter().find(|s| s.id == sprite_id)
    }

    pub fn contains_id(&self, sprite_id: &str) -> bool {
        self.find(sprite_id).is_some()
    }

    pub fn push(&mut self, sprite: SpriteMetadata) {
        self.sprites.push(sprite);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteMetadata> {
        self.sprites.iter()
    }

    pub fn as_slice(&self) -> &[SpriteMetadata] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl FromIterator<SpriteMetadata> for SpriteCatalog {
    fn from_iter<I: IntoIterator<Item = SpriteMetadata>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers() {
        let rect = SpriteRect::new(0, 0, 64, 32);
        assert!(rect.covers(64, 32));
        assert!(!rect.covers(64, 64));
        assert!(!SpriteRect::new(1, 0, 64, 32).covers(64, 32));
        assert!(SpriteRect::new(0, 0, 16, 32).is_smaller_than(64, 32));
    }

    #[test]
    fn test_catalog_filters_by_kind() {
        let catalog: SpriteCatalog = vec![
            SpriteMetadata::single("stone", "stone", EntityKind::Orb, 32, 32),
            SpriteMetadata::single("slime", "slime", EntityKind::Enemy, 32, 32),
        ]
        .into_iter()
        .collect();

        let orbs = catalog.of_kind(EntityKind::Orb);
        assert_eq!(orbs.len(), 1);
        assert!(orbs.contains_id("stone"));
        assert!(!orbs.contains_id("slime"));
    }

    #[test]
    fn test_metadata_type_field_name() {
        let meta = SpriteMetadata::single("stone", "stone", EntityKind::Orb, 32, 32);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "Orb");
        assert_eq!(json["frame_count"], 1);
        assert!(json.get("atlas_frames").is_none());
    }
}
