//! Static map objects

use std::collections::HashMap;

use crate::collision::Hitbox;

/// A map-authored object with optional collidable geometry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldObject {
    hitbox: Option<Hitbox>,
    /// `name`, `type` and custom properties; opaque to collision
    pub data: HashMap<String, String>,
}

impl WorldObject {
    /// Object with the given geometry and no properties
    pub fn new(hitbox: Option<Hitbox>) -> Self {
        Self {
            hitbox,
            data: HashMap::new(),
        }
    }

    /// Collidable geometry; `None` for markers and objects with bad data
    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    /// Set a property
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// Property lookup
    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
