//! World model
//!
//! - [`registry`] - Handle arenas for entities, HUD objects and map objects
//! - [`entity`] - Entity and HUD object traits, per-frame entity view
//! - [`tile`] - Tiles, tile layers and tile animation
//! - [`object`] - Static map objects
//! - [`world`] - The world itself: map loading, frame pass, queries

pub mod entity;
pub mod object;
pub mod registry;
pub mod tile;
#[allow(clippy::module_inception)]
pub mod world;


pub use entity::{Entity, EntityFrame, HudObject, QueryError};
pub use object::WorldObject;
pub use registry::{EntityHandle, HudHandle, Registry, WorldObjectHandle};
pub use tile::{AnimationFrame, Tile, TileLayer, EMPTY_TILE};
pub use world::World;
