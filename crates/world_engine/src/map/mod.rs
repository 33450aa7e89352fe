//! Tile-map input
//!
//! - [`description`] - Pre-parsed map, tile set and object descriptions
//! - [`shape`] - Map object to hitbox conversion
//! - [`loader`] - Reading descriptions from disk
//! - [`error`] - Load and data errors

pub mod description;
pub mod error;
pub mod loader;
pub mod shape;

pub use description::{
    FrameDescription, ImageDescription, LayerDescription, MapDescription, ObjectDescription,
    ObjectGroupDescription, Property, ShapeDescription, TileDescription, TilesetDescription,
    TilesetRef,
};
pub use error::{MapDataError, MapLoadError};
pub use loader::{MapLoader, TilesetSource};
pub use shape::{build_hitbox, TileScale};
