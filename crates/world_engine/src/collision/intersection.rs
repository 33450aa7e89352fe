//! Collision query results

use crate::foundation::math::Vec2;
use crate::world::{EntityHandle, WorldObjectHandle};

/// Result of a pairwise overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Overlap along the axis of least penetration (zero when just touching)
    pub penetration_depth: f32,
    /// Minimum translation vector, pointing from the tested shape toward the other one
    pub mtv: Vec2,
}

/// The thing a query subject collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counterpart {
    /// Another live entity
    Entity(EntityHandle),
    /// A static object loaded from the map
    WorldObject(WorldObjectHandle),
}

/// One hit reported by a world query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Colliding counterpart
    pub other: Counterpart,
    /// Overlap along the axis of least penetration
    pub penetration_depth: f32,
    /// Minimum translation vector; move the subject by `-mtv` to resolve
    pub mtv: Vec2,
}

impl Intersection {
    /// Tag a pairwise contact with its counterpart
    pub fn new(other: Counterpart, contact: Contact) -> Self {
        Self {
            other,
            penetration_depth: contact.penetration_depth,
            mtv: contact.mtv,
        }
    }

    /// Handle of the colliding entity, if the counterpart is one
    pub fn entity(&self) -> Option<EntityHandle> {
        match self.other {
            Counterpart::Entity(handle) => Some(handle),
            Counterpart::WorldObject(_) => None,
        }
    }

    /// Handle of the colliding world object, if the counterpart is one
    pub fn world_object(&self) -> Option<WorldObjectHandle> {
        match self.other {
            Counterpart::WorldObject(handle) => Some(handle),
            Counterpart::Entity(_) => None,
        }
    }

    /// Displacement that resolves this overlap when applied to the subject
    pub fn resolution(&self) -> Vec2 {
        -self.mtv
    }
}
