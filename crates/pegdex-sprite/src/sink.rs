//! Sprite export seam.
//!
//! Pixel decoding and bitmap writing live outside this crate. The pipeline
//! hands each resolved sprite to a [`SpriteSink`] and records the returned
//! path on the sprite and on the entity.

use std::io;

use pegdex_model::{EntityKind, SpriteHandle, SpriteMetadata};

/// Receives resolved sprites for export.
pub trait SpriteSink {
    /// Exports the sprite and returns its path relative to the output root.
    fn export(&mut self, handle: &SpriteHandle, sprite: &SpriteMetadata) -> io::Result<String>;
}

/// Relative export path for a sprite: `sprites/{kind-plural}/{id}.png`.
pub fn sprite_path(kind: EntityKind, sprite_id: &str) -> String {
    format!("sprites/{}/{}.png", kind.dir_name(), sprite_id)
}

/// Sink that assigns paths without writing any pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOnlySink;

impl SpriteSink for PathOnlySink {
    fn export(&mut self, _handle: &SpriteHandle, sprite: &SpriteMetadata) -> io::Result<String> {
        Ok(sprite_path(sprite.sprite_type, &sprite.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegdex_model::AssetHandle;

    #[test]
    fn test_path_only_sink() {
        let sprite = SpriteMetadata::single("stone_orb", "StoneOrb", EntityKind::Orb, 32, 32);
        let handle = SpriteHandle::texture(AssetHandle::new(0, 7));
        let path = PathOnlySink.export(&handle, &sprite).unwrap();
        assert_eq!(path, "sprites/orbs/stone_orb.png");
        assert_eq!(sprite_path(EntityKind::Enemy, "slime"), "sprites/enemies/slime.png");
    }
}
