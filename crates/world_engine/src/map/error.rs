//! Map loading errors

use std::path::PathBuf;

use crate::collision::InvalidHitboxError;

/// A whole map (or one of its tile sets) could not be loaded
#[derive(thiserror::Error, Debug)]
pub enum MapLoadError {
    /// File missing or unreadable
    #[error("can't read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File present but not a valid description
    #[error("can't parse {path}: {message}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Deserializer message
        message: String,
    },

    /// Tile set referenced by the map but not provided
    #[error("tile set {0} not found")]
    MissingTileset(String),

    /// Tile set with unusable dimensions
    #[error("tile set {source_name} is invalid: {reason}")]
    InvalidTileset {
        /// Tile set source as referenced by the map
        source_name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Map grid with a zero dimension
    #[error("map grid {width}x{height} is empty")]
    InvalidGrid {
        /// Declared width in tiles
        width: u32,
        /// Declared height in tiles
        height: u32,
    },
}

/// One layer or object carries malformed data; the rest of the map still loads
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MapDataError {
    /// Text that should be a number isn't
    #[error("invalid number {text:?}")]
    InvalidNumber {
        /// Offending token
        text: String,
    },

    /// Polygon point without a `,`-separated y coordinate
    #[error("polygon point {text:?} is not an x,y pair")]
    UnpairedCoordinate {
        /// Offending token
        text: String,
    },

    /// Layer whose cell count does not match the map grid
    #[error("layer {layer} has {found} tiles, expected {expected}")]
    LayerSize {
        /// Layer name
        layer: String,
        /// width * height
        expected: usize,
        /// Cells actually present
        found: usize,
    },

    /// Geometry that parsed but cannot form a hitbox
    #[error("degenerate shape: {0}")]
    DegenerateShape(#[from] InvalidHitboxError),
}
