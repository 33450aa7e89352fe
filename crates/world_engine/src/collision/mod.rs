//! Collision detection between hitboxes
//!
//! Hitboxes are tested pairwise with the separating-axis theorem. There is no
//! broad phase; the world runs a full scan per query.
//!
//! - [`hitbox`] - Polygon and ellipse shapes
//! - [`sat`] - Pairwise overlap test and minimum translation vector
//! - [`intersection`] - Query result types

pub mod hitbox;
pub mod intersection;
pub mod sat;

pub use hitbox::{Hitbox, InvalidHitboxError};
pub use intersection::{Contact, Counterpart, Intersection};
pub use sat::{overlaps, test};
