//! Pre-parsed tile-map descriptions
//!
//! These are the primitives handed over by the map format layer. Numeric
//! lists (layer cells, polygon points) stay as text so that a malformed entry
//! only fails the layer or object it belongs to.

use serde::{Deserialize, Serialize};

use super::error::MapDataError;

/// Layer class marking layers drawn after entities
pub const FOREGROUND_CLASS: &str = "foreground";

/// A complete map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Tile width in map pixels
    pub tile_width: u32,
    /// Tile height in map pixels
    pub tile_height: u32,
    /// Tile sets, each owning a range of global tile IDs
    #[serde(default)]
    pub tilesets: Vec<TilesetRef>,
    /// Tile layers in draw order
    #[serde(default)]
    pub layers: Vec<LayerDescription>,
    /// Object groups holding static collidable objects
    #[serde(default)]
    pub object_groups: Vec<ObjectGroupDescription>,
}

/// Reference from a map to a tile set file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetRef {
    /// Global ID of the tile set's first tile
    pub first_gid: u32,
    /// Tile set path relative to the worlds directory
    pub source: String,
}

/// One tile layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescription {
    /// Layer name
    pub name: String,
    /// Optional class; `"foreground"` draws after entities
    #[serde(default)]
    pub class: Option<String>,
    /// Comma-separated global tile IDs, row-major
    pub data: String,
}

impl LayerDescription {
    /// Whether the layer draws after entities
    pub fn is_foreground(&self) -> bool {
        self.class.as_deref() == Some(FOREGROUND_CLASS)
    }

    /// Parse the cell list, checking it against the grid size
    pub fn parse_tile_ids(&self, width: u32, height: u32) -> Result<Vec<u32>, MapDataError> {
        let tile_ids = self
            .data
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|_| MapDataError::InvalidNumber {
                    text: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let expected = width as usize * height as usize;
        if tile_ids.len() != expected {
            return Err(MapDataError::LayerSize {
                layer: self.name.clone(),
                expected,
                found: tile_ids.len(),
            });
        }
        Ok(tile_ids)
    }
}

/// A group of map objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroupDescription {
    /// Group name
    #[serde(default)]
    pub name: String,
    /// Objects in the group
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

/// A map-authored object; positions and sizes are in map pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Object name
    #[serde(default)]
    pub name: Option<String>,
    /// Object type, stored as the `type` property
    #[serde(default)]
    pub kind: Option<String>,
    /// Anchor x
    pub x: f32,
    /// Anchor y
    pub y: f32,
    /// Width (rectangles and ellipses)
    #[serde(default)]
    pub width: f32,
    /// Height (rectangles and ellipses)
    #[serde(default)]
    pub height: f32,
    /// Shape marker; a rectangle when absent
    #[serde(default)]
    pub shape: Option<ShapeDescription>,
    /// Custom properties
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Non-rectangular object shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeDescription {
    /// Point list such as `"0,0 32,0 16,24"`, relative to the object anchor
    Polygon {
        /// Space-separated `x,y` pairs
        points: String,
    },
    /// Ellipse inscribed in the object's box
    Ellipse,
    /// Single point at the anchor
    Point,
}

/// Name/value property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Property value
    pub value: String,
}

/// A tile set file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetDescription {
    /// Tile set name
    #[serde(default)]
    pub name: String,
    /// Tile width in texture pixels
    pub tile_width: u32,
    /// Tile height in texture pixels
    pub tile_height: u32,
    /// Tiles per texture row
    pub columns: u32,
    /// Number of tiles
    pub tile_count: u32,
    /// Texture the tiles are cut from
    pub image: ImageDescription,
    /// Per-tile extras; tiles without extras are omitted
    #[serde(default)]
    pub tiles: Vec<TileDescription>,
}

/// Tile set texture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescription {
    /// Image path as written by the map editor
    pub source: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Extra data for one tile of a tile set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescription {
    /// Local tile ID within the tile set
    pub id: u32,
    /// Tile type, stored as the `type` property
    #[serde(default)]
    pub kind: Option<String>,
    /// Custom properties
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Animation frames in play order
    #[serde(default)]
    pub animation: Vec<FrameDescription>,
}

/// One animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDescription {
    /// Local tile ID shown during the frame
    pub tile_id: u32,
    /// Frame length in milliseconds
    pub duration: u64,
}
