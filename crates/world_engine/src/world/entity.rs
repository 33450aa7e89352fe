//! Entity and HUD object contracts
//!
//! Entities and HUD objects are implemented by gameplay code. The world owns
//! them, calls them once per frame and lets entities query their own
//! intersections while they update.

use log::error;

use super::object::WorldObject;
use super::registry::{EntityHandle, Registry, WorldObjectHandle};
use crate::collision::{self, Counterpart, Hitbox, Intersection, InvalidHitboxError};
use crate::render::RenderContext;

/// A live, moving participant in the world
pub trait Entity {
    /// Display name; not unique
    fn name(&self) -> &str;

    /// Current hitbox, in tile units
    fn hitbox(&self) -> Hitbox;

    /// Per-frame logic
    fn update(&mut self, frame: &mut EntityFrame<'_>) {
        let _ = frame;
    }
}

/// Screen-space overlay updated after all entities
pub trait HudObject {
    /// Per-frame logic
    fn update(&mut self, render: &mut RenderContext, now_ms: u64);
}

/// Spatial query failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Subject handle is not an attached entity of this world
    #[error("entity {0:?} is not in the world")]
    UnknownEntity(EntityHandle),

    /// A hitbox involved in the scan is degenerate
    #[error("invalid hitbox while testing against {other:?}: {source}")]
    InvalidHitbox {
        /// Counterpart being tested when the error surfaced
        other: Counterpart,
        /// What was wrong with the shape
        #[source]
        source: InvalidHitboxError,
    },
}

/// Read-only view of the collidable contents of a world
#[derive(Clone, Copy)]
pub(crate) struct Scene<'a> {
    pub(crate) entities: &'a Registry<EntityHandle, Box<dyn Entity>>,
    pub(crate) objects: &'a Registry<WorldObjectHandle, WorldObject>,
}

impl Scene<'_> {
    /// Brute-force scan: every other attached entity, then every world object
    pub(crate) fn intersections(
        &self,
        subject: EntityHandle,
        hitbox: &Hitbox,
    ) -> Result<Vec<Intersection>, QueryError> {
        let mut intersections = Vec::new();

        for (handle, entity) in self.entities.iter_active() {
            if handle == subject {
                continue;
            }
            let other = Counterpart::Entity(handle);
            if let Some(contact) = check(hitbox, &entity.hitbox(), other)? {
                intersections.push(Intersection::new(other, contact));
            }
        }

        for (handle, object) in self.objects.iter_active() {
            let Some(object_hitbox) = object.hitbox() else {
                continue;
            };
            let other = Counterpart::WorldObject(handle);
            if let Some(contact) = check(hitbox, object_hitbox, other)? {
                intersections.push(Intersection::new(other, contact));
            }
        }

        Ok(intersections)
    }
}

fn check(
    subject: &Hitbox,
    other_hitbox: &Hitbox,
    other: Counterpart,
) -> Result<Option<collision::Contact>, QueryError> {
    collision::test(subject, other_hitbox).map_err(|source| {
        error!("Invalid hitbox while testing against {:?}: {}", other, source);
        QueryError::InvalidHitbox { other, source }
    })
}

/// What an entity sees while it updates
pub struct EntityFrame<'a> {
    pub(crate) handle: EntityHandle,
    pub(crate) now_ms: u64,
    pub(crate) render: &'a mut RenderContext,
    pub(crate) scene: Scene<'a>,
}

impl EntityFrame<'_> {
    /// Handle of the entity being updated
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// Current time from the host clock
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Render context for issuing draws or moving the camera
    pub fn render(&mut self) -> &mut RenderContext {
        &mut *self.render
    }

    /// Everything the given hitbox overlaps, excluding the entity being updated
    pub fn intersections(&self, hitbox: &Hitbox) -> Result<Vec<Intersection>, QueryError> {
        self.scene.intersections(self.handle, hitbox)
    }

    /// Another attached entity
    pub fn entity(&self, handle: EntityHandle) -> Option<&dyn Entity> {
        self.scene.entities.get(handle).map(|entity| &**entity)
    }

    /// A world object
    pub fn world_object(&self, handle: WorldObjectHandle) -> Option<&WorldObject> {
        self.scene.objects.get(handle)
    }
}
