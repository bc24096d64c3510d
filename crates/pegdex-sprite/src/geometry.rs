//! Frame layout detection for sprite textures.
//!
//! Given a texture (or a sprite cut from one) and its pixel size, decides
//! whether it holds a single image or a strip/grid of same-sized frames.
//! Resolution never fails: anything undetectable is a single frame covering
//! the texture.
//!
//! Decision order, first applicable rule wins:
//!
//! 1. A sub-rect covering the whole texture is a single frame.
//! 2. A small sub-rect (both sides within the packing limit) on a texture
//!    named after an entity kind is one sprite packed into a larger atlas.
//! 3. Any other sub-rect is the frame region; the generic detector splits it.
//! 4. Without a sub-rect the generic detector runs over the whole texture.

use pegdex_model::{entity_id, EntityKind, SpriteFrame, SpriteHandle, SpriteMetadata, SpriteRect};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Heuristic tables
// ============================================================================

/// Candidate frame sizes for strip and square-grid detection, ascending.
pub const CANDIDATE_FRAME_SIZES: &[u32] = &[16, 24, 32, 48, 64, 80, 96, 128];

/// Name fragments marking textures that are almost always a single image.
pub const SINGLE_SPRITE_KEYWORDS: &[&str] = &[
    "boulder", "background", "backdrop", "ui_", "_ui", "button", "panel", "border", "icon", "logo",
    "cursor", "sword", "shield", "helmet", "armor", "bow", "staff", "wand", "hammer", "axe",
    "dagger",
];

/// Name fragments that mark a texture as belonging to an entity.
pub const ENTITY_SOURCE_KEYWORDS: &[&str] = &["orb", "relic", "enemy"];

// ============================================================================
// Configuration
// ============================================================================

/// Tunable thresholds for layout detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Textures wider or taller than this are never split.
    pub max_detect_dimension: u32,
    /// Textures narrower or shorter than this are never split.
    pub min_detect_dimension: u32,
    /// Frame sizes tried by strip and square-grid detection.
    pub candidate_sizes: Vec<u32>,
    pub strip_min_frames: u32,
    pub strip_max_frames: u32,
    pub grid_min_frames: u32,
    pub grid_max_frames: u32,
    /// Bounds on rows and columns of a square grid.
    pub grid_min_cells: u32,
    pub grid_max_cells: u32,
    /// Frame side bounds for the factor-pair search.
    pub factor_min_frame_size: u32,
    pub factor_max_frame_size: u32,
    pub factor_min_frames: u32,
    pub factor_max_frames: u32,
    /// Drop the last cell of an exact 3x3 grid.
    pub omit_last_in_3x3: bool,
    /// Largest sub-rect side treated as a single packed sprite.
    pub packed_sprite_max_size: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            max_detect_dimension: 512,
            min_detect_dimension: 32,
            candidate_sizes: CANDIDATE_FRAME_SIZES.to_vec(),
            strip_min_frames: 3,
            strip_max_frames: 16,
            grid_min_frames: 4,
            grid_max_frames: 25,
            grid_min_cells: 2,
            grid_max_cells: 5,
            factor_min_frame_size: 16,
            factor_max_frame_size: 128,
            factor_min_frames: 4,
            factor_max_frames: 50,
            omit_last_in_3x3: true,
            packed_sprite_max_size: 64,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// How a grid was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    HorizontalStrip,
    VerticalStrip,
    SquareGrid,
    FactorPair,
}

/// A detected grid of equally sized frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub kind: LayoutKind,
    pub columns: u32,
    pub rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl GridLayout {
    fn new(kind: LayoutKind, columns: u32, rows: u32, frame_width: u32, frame_height: u32) -> Self {
        Self {
            kind,
            columns,
            rows,
            frame_width,
            frame_height,
        }
    }

    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Synthesizes frames in row-major order, offset by `origin`.
    pub fn frames(&self, name: &str, origin: (u32, u32), omit_last_in_3x3: bool) -> Vec<SpriteFrame> {
        let mut count = self.cell_count();
        if omit_last_in_3x3 && self.columns == 3 && self.rows == 3 {
            count -= 1;
        }

        (0..count)
            .map(|index| {
                let col = index % self.columns;
                let row = index / self.columns;
                let rect = SpriteRect::new(
                    origin.0 + col * self.frame_width,
                    origin.1 + row * self.frame_height,
                    self.frame_width,
                    self.frame_height,
                );
                SpriteFrame::centered(format!("{}_{}", name, index), rect)
            })
            .collect()
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Infers single-sprite vs atlas layout for sprite textures.
#[derive(Debug, Clone, Default)]
pub struct SpriteGeometryResolver {
    config: GeometryConfig,
}

impl SpriteGeometryResolver {
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Resolves the frame geometry of `handle`.
    ///
    /// `width` and `height` are the pixel size of the underlying texture.
    /// The sprite id is derived from `source_name` the same way entity ids
    /// are derived from asset names.
    pub fn resolve(
        &self,
        handle: &SpriteHandle,
        width: u32,
        height: u32,
        source_name: &str,
        kind: EntityKind,
    ) -> SpriteMetadata {
        let id = entity_id(source_name);
        let single = SpriteMetadata::single(id, source_name, kind, width, height);

        let Some(rect) = handle.rect else {
            return match self.detect(width, height, source_name) {
                Some(layout) => self.atlas(single, &layout, (0, 0)),
                None => single,
            };
        };

        if rect.covers(width, height) {
            debug!(sprite = source_name, "sprite rect covers texture");
            return single;
        }

        if self.is_packed_sprite(&rect, width, height, source_name) {
            debug!(sprite = source_name, ?rect, "single sprite packed in atlas");
            return packed(single, rect);
        }

        match self.detect(rect.width, rect.height, source_name) {
            Some(layout) => self.atlas(single, &layout, (rect.x, rect.y)),
            None => packed(single, rect),
        }
    }

    /// Runs the generic detector over a `width x height` region.
    pub fn detect(&self, width: u32, height: u32, name: &str) -> Option<GridLayout> {
        let c = &self.config;
        if width > c.max_detect_dimension
            || height > c.max_detect_dimension
            || width < c.min_detect_dimension
            || height < c.min_detect_dimension
        {
            return None;
        }
        if is_likely_single_sprite(name) {
            debug!(sprite = name, "skipping detection for single-sprite name");
            return None;
        }

        let layout = self
            .horizontal_strip(width, height)
            .or_else(|| self.vertical_strip(width, height))
            .or_else(|| self.square_grid(width, height))
            .or_else(|| self.factor_pairs(width, height));

        if let Some(layout) = &layout {
            debug!(
                sprite = name,
                kind = ?layout.kind,
                columns = layout.columns,
                rows = layout.rows,
                "detected frame layout"
            );
        }
        layout
    }

    fn is_packed_sprite(&self, rect: &SpriteRect, width: u32, height: u32, name: &str) -> bool {
        let limit = self.config.packed_sprite_max_size;
        let name = name.to_lowercase();
        rect.is_smaller_than(width, height)
            && rect.width <= limit
            && rect.height <= limit
            && ENTITY_SOURCE_KEYWORDS.iter().any(|k| name.contains(k))
    }

    fn atlas(&self, mut meta: SpriteMetadata, layout: &GridLayout, origin: (u32, u32)) -> SpriteMetadata {
        let frames = layout.frames(&meta.id, origin, self.config.omit_last_in_3x3);
        meta.is_atlas = true;
        meta.frame_width = layout.frame_width;
        meta.frame_height = layout.frame_height;
        meta.frame_count = frames.len() as u32;
        meta.atlas_frames = frames;
        meta
    }

    fn strip_frames_in_range(&self, frames: u32) -> bool {
        (self.config.strip_min_frames..=self.config.strip_max_frames).contains(&frames)
    }

    fn horizontal_strip(&self, width: u32, height: u32) -> Option<GridLayout> {
        self.config
            .candidate_sizes
            .iter()
            .copied()
            .filter(|&size| size > 0 && height == size && width % size == 0)
            .find(|&size| self.strip_frames_in_range(width / size))
            .map(|size| GridLayout::new(LayoutKind::HorizontalStrip, width / size, 1, size, size))
    }

    fn vertical_strip(&self, width: u32, height: u32) -> Option<GridLayout> {
        self.config
            .candidate_sizes
            .iter()
            .copied()
            .filter(|&size| size > 0 && width == size && height % size == 0)
            .find(|&size| self.strip_frames_in_range(height / size))
            .map(|size| GridLayout::new(LayoutKind::VerticalStrip, 1, height / size, size, size))
    }

    fn square_grid(&self, width: u32, height: u32) -> Option<GridLayout> {
        let c = &self.config;
        let cells = c.grid_min_cells..=c.grid_max_cells;
        let frames = c.grid_min_frames..=c.grid_max_frames;

        c.candidate_sizes
            .iter()
            .copied()
            .filter(|&size| size > 0 && width % size == 0 && height % size == 0)
            .map(|size| GridLayout::new(LayoutKind::SquareGrid, width / size, height / size, size, size))
            .find(|g| cells.contains(&g.columns) && cells.contains(&g.rows) && frames.contains(&g.cell_count()))
    }

    /// Enumerates divisor pairs and keeps the candidate whose frames are
    /// closest to square. Ties keep the first candidate found.
    fn factor_pairs(&self, width: u32, height: u32) -> Option<GridLayout> {
        let c = &self.config;
        let sizes = c.factor_min_frame_size..=c.factor_max_frame_size;
        let frames = c.factor_min_frames..=c.factor_max_frames;

        let mut best: Option<(f64, GridLayout)> = None;
        for columns in (2..=width).filter(|cols| width % cols == 0) {
            let frame_width = width / columns;
            if !sizes.contains(&frame_width) {
                continue;
            }
            for rows in (2..=height).filter(|rows| height % rows == 0) {
                let frame_height = height / rows;
                if !sizes.contains(&frame_height) || !frames.contains(&(columns * rows)) {
                    continue;
                }
                let score = squareness(frame_width, frame_height);
                if best.as_ref().map_or(true, |(b, _)| score < *b) {
                    let layout = GridLayout::new(LayoutKind::FactorPair, columns, rows, frame_width, frame_height);
                    best = Some((score, layout));
                }
            }
        }
        best.map(|(_, layout)| layout)
    }
}

/// Returns true if the name marks a texture that should never be split.
pub fn is_likely_single_sprite(name: &str) -> bool {
    let name = name.to_lowercase();
    SINGLE_SPRITE_KEYWORDS.iter().any(|k| name.contains(k))
}

/// Relative side difference; 0.0 is a perfect square.
fn squareness(width: u32, height: u32) -> f64 {
    let max = width.max(height) as f64;
    (width as f64 - height as f64).abs() / max
}

fn packed(mut meta: SpriteMetadata, rect: SpriteRect) -> SpriteMetadata {
    meta.is_atlas = true;
    meta.frame_width = rect.width;
    meta.frame_height = rect.height;
    meta.frame_count = 1;
    meta.atlas_frames = vec![SpriteFrame::centered(format!("{}_0", meta.id), rect)];
    meta
}
