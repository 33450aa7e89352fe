//! Tiles and tile layers

use std::collections::HashMap;

use crate::map::{LayerDescription, MapDataError, TileDescription};
use crate::render::{SourceRect, TextureHandle};

/// Global tile ID meaning "no tile"
pub const EMPTY_TILE: u32 = 0;

/// One grid of global tile IDs, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// Layer name
    pub name: String,
    tile_ids: Vec<u32>,
}

impl TileLayer {
    /// Build a layer, checking its cell count against the grid
    pub fn from_description(
        description: &LayerDescription,
        width: u32,
        height: u32,
    ) -> Result<Self, MapDataError> {
        Ok(Self {
            name: description.name.clone(),
            tile_ids: description.parse_tile_ids(width, height)?,
        })
    }

    /// All cells, row-major
    pub fn tile_ids(&self) -> &[u32] {
        &self.tile_ids
    }

    /// Tile ID at a cell; `None` outside the grid
    pub fn tile_at(&self, column: u32, row: u32, width: u32) -> Option<u32> {
        if column >= width {
            return None;
        }
        let index = row as usize * width as usize + column as usize;
        self.tile_ids.get(index).copied()
    }
}

/// One frame of a tile animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Tile (local to its tile set) shown during the frame
    pub tile_id: u32,
    /// Frame length in milliseconds
    pub duration_ms: u64,
}

/// A drawable tile with optional animation and authored properties
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    texture: Option<TextureHandle>,
    width: u32,
    height: u32,
    columns: u32,
    origin: SourceRect,
    current: SourceRect,
    frames: Vec<AnimationFrame>,
    frame_index: usize,
    frame_start_ms: u64,
    /// Authored properties, including `type` when set
    pub data: HashMap<String, String>,
}

impl Tile {
    /// Placeholder for global ID 0 and gaps between tile sets
    pub fn empty() -> Self {
        Self {
            texture: None,
            width: 0,
            height: 0,
            columns: 1,
            origin: SourceRect::default(),
            current: SourceRect::default(),
            frames: Vec::new(),
            frame_index: 0,
            frame_start_ms: 0,
            data: HashMap::new(),
        }
    }

    /// Tile cut from a tile set texture at a local ID
    pub fn new(texture: TextureHandle, local_id: u32, width: u32, height: u32, columns: u32) -> Self {
        let columns = columns.max(1);
        let origin = cell_rect(local_id, width, height, columns);
        Self {
            texture: Some(texture),
            width,
            height,
            columns,
            origin,
            current: origin,
            frames: Vec::new(),
            frame_index: 0,
            frame_start_ms: 0,
            data: HashMap::new(),
        }
    }

    /// Apply type, properties and animation from the tile set
    pub fn apply_description(&mut self, description: &TileDescription) {
        if let Some(kind) = &description.kind {
            self.data.insert("type".to_string(), kind.clone());
        }
        for property in &description.properties {
            self.data.insert(property.name.clone(), property.value.clone());
        }
        self.frames.extend(description.animation.iter().map(|frame| AnimationFrame {
            tile_id: frame.tile_id,
            duration_ms: frame.duration,
        }));
    }

    /// Texture the tile is drawn from; `None` for the empty tile
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Region of the texture currently shown
    pub fn source_rect(&self) -> SourceRect {
        self.current
    }

    /// Region of the tile's own cell, ignoring animation
    pub fn origin_rect(&self) -> SourceRect {
        self.origin
    }

    /// Whether the tile has animation frames
    pub fn is_animated(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Animation frames in play order
    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Index of the frame currently shown
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Property lookup
    pub fn property(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Step the animation if the current frame has run its course.
    ///
    /// Returns whether the shown frame changed.
    pub fn advance_animation(&mut self, now_ms: u64) -> bool {
        let Some(frame) = self.frames.get(self.frame_index) else {
            return false;
        };
        if self.frame_start_ms.saturating_add(frame.duration_ms) > now_ms {
            return false;
        }
        self.frame_start_ms = now_ms;
        self.frame_index = (self.frame_index + 1) % self.frames.len();
        let next = self.frames[self.frame_index];
        self.current = cell_rect(next.tile_id, self.width, self.height, self.columns);
        true
    }
}

fn cell_rect(local_id: u32, width: u32, height: u32, columns: u32) -> SourceRect {
    SourceRect::new(local_id % columns * width, local_id / columns * height, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{FrameDescription, Property};
    use crate::render::RenderContext;

    fn texture() -> TextureHandle {
        RenderContext::default().texture("tiles", "tiles.png")
    }

    #[test]
    fn test_source_rect_from_local_id() {
        let tile = Tile::new(texture(), 5, 16, 16, 4);
        assert_eq!(tile.source_rect(), SourceRect::new(16, 16, 16, 16));
        assert!(!tile.is_animated());
    }

    #[test]
    fn test_description_sets_type_and_properties() {
        let mut tile = Tile::new(texture(), 0, 16, 16, 4);
        tile.apply_description(&TileDescription {
            id: 0,
            kind: Some("water".to_string()),
            properties: vec![Property { name: "hazard".to_string(), value: "true".to_string() }],
            animation: Vec::new(),
        });
        assert_eq!(tile.property("type"), Some("water"));
        assert_eq!(tile.property("hazard"), Some("true"));
        assert_eq!(tile.property("solid"), None);
    }

    #[test]
    fn test_animation_advances_and_wraps() {
        let mut tile = Tile::new(texture(), 0, 16, 16, 4);
        tile.apply_description(&TileDescription {
            id: 0,
            kind: None,
            properties: Vec::new(),
            animation: vec![
                FrameDescription { tile_id: 1, duration: 100 },
                FrameDescription { tile_id: 6, duration: 50 },
            ],
        });
        assert!(tile.is_animated());

        assert!(!tile.advance_animation(99));
        assert!(tile.advance_animation(100));
        assert_eq!(tile.frame_index(), 1);
        assert_eq!(tile.source_rect(), SourceRect::new(32, 16, 16, 16));

        assert!(!tile.advance_animation(149));
        assert!(tile.advance_animation(150));
        assert_eq!(tile.frame_index(), 0);
        assert_eq!(tile.source_rect(), SourceRect::new(16, 0, 16, 16));
        assert_eq!(tile.origin_rect(), SourceRect::new(0, 0, 16, 16));
    }

    #[test]
    fn test_layer_lookup() {
        let description = LayerDescription {
            name: "ground".to_string(),
            class: None,
            data: "1,2,3,4,5,6".to_string(),
        };
        let layer = TileLayer::from_description(&description, 3, 2).unwrap();
        assert_eq!(layer.tile_at(2, 1, 3), Some(6));
        assert_eq!(layer.tile_at(3, 0, 3), None);
        assert_eq!(layer.tile_at(0, 2, 3), None);
    }
}
