//! # World Engine
//!
//! A 2D tile-map world with convex collision detection.
//!
//! ## Features
//!
//! - **Hitboxes**: Convex polygons and axis-aligned ellipses in tile units
//! - **SAT Collision**: Overlap tests with penetration depth and minimum translation vector
//! - **Tile Maps**: RON map and tile set descriptions, layered drawing, tile animation
//! - **World Model**: Handle-based entity, HUD and map object registries with spatial queries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use world_engine::prelude::*;
//!
//! struct Player {
//!     hitbox: Hitbox,
//! }
//!
//! impl Entity for Player {
//!     fn name(&self) -> &str {
//!         "player"
//!     }
//!
//!     fn hitbox(&self) -> Hitbox {
//!         self.hitbox.clone()
//!     }
//!
//!     fn update(&mut self, frame: &mut EntityFrame<'_>) {
//!         if let Ok(hits) = frame.intersections(&self.hitbox) {
//!             for hit in hits {
//!                 self.hitbox.translate(hit.resolution());
//!             }
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let loader = MapLoader::from_config(&config.assets);
//!     let mut ctx = RenderContext::default();
//!     let mut world = World::with_options(config.objects);
//!     world.load_map("level1", &loader, &mut ctx)?;
//!     world.create_entity(Box::new(Player {
//!         hitbox: Hitbox::square(Vec2::new(2.5, 2.5), 1.0),
//!     }));
//!
//!     let clock = SystemClock::new();
//!     world.update(&mut ctx, clock.now_ms());
//!     for command in ctx.drain_commands() {
//!         // Hand the command to the presenting backend
//!         let _ = command;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod map;
pub mod render;
pub mod world;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        collision::{Counterpart, Hitbox, Intersection, InvalidHitboxError},
        config::{Config, EngineConfig, ObjectOptions},
        foundation::{
            math::{GridPos, Vec2},
            time::{Clock, ManualClock, SystemClock},
        },
        map::{MapDescription, MapLoadError, MapLoader},
        render::{Camera2D, DrawCommand, RenderContext, ScreenRect, Viewport},
        world::{
            Entity, EntityFrame, EntityHandle, HudHandle, HudObject, QueryError, World,
            WorldObject, WorldObjectHandle,
        },
    };
}
