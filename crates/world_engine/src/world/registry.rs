//! Handle-indexed storage with an ordered active list
//!
//! Values live in a generation-checked arena. Attaching a handle puts it in
//! the active list, which drives update and draw order; detaching takes it
//! out of iteration without dropping the value.

use log::warn;
use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to an entity owned by the world
    pub struct EntityHandle;

    /// Stable handle to a HUD object owned by the world
    pub struct HudHandle;

    /// Stable handle to a static map object
    pub struct WorldObjectHandle;
}

/// Arena plus insertion-ordered list of attached handles
pub struct Registry<K: Key, T> {
    // A slot is `None` only while its value is checked out for an update
    slots: SlotMap<K, Option<T>>,
    active: Vec<K>,
    label: &'static str,
}

impl<K: Key, T> Registry<K, T> {
    /// Create an empty registry; `label` names the contents in log messages
    pub fn new(label: &'static str) -> Self {
        Self {
            slots: SlotMap::with_key(),
            active: Vec::new(),
            label,
        }
    }

    /// Store a value without attaching it
    pub fn insert(&mut self, value: T) -> K {
        self.slots.insert(Some(value))
    }

    /// Store a value and attach it
    pub fn insert_attached(&mut self, value: T) -> K {
        let key = self.insert(value);
        self.active.push(key);
        key
    }

    /// Append a stored handle to the active list.
    ///
    /// Returns `false` and logs a warning when the handle is already attached
    /// or no longer refers to a stored value.
    pub fn attach(&mut self, key: K) -> bool {
        if !self.slots.contains_key(key) {
            warn!("{} {:?} is not stored in this world", self.label, key);
            return false;
        }
        if self.active.contains(&key) {
            warn!("{} already in world", self.label);
            return false;
        }
        self.active.push(key);
        true
    }

    /// Remove a handle from the active list, keeping the stored value
    pub fn detach(&mut self, key: K) -> Option<K> {
        let position = self.active.iter().position(|&k| k == key)?;
        Some(self.active.remove(position))
    }

    /// Detach and hand back ownership of a value
    pub fn take(&mut self, key: K) -> Option<T> {
        self.detach(key);
        self.slots.remove(key).flatten()
    }

    /// Drop every stored value
    pub fn clear(&mut self) {
        self.active.clear();
        self.slots.clear();
    }

    /// Stored value, attached or not
    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key).and_then(Option::as_ref)
    }

    /// Stored value, attached or not
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key).and_then(Option::as_mut)
    }

    /// Whether a handle is in the active list
    pub fn is_attached(&self, key: K) -> bool {
        self.active.contains(&key)
    }

    /// Attached handles in insertion order
    pub fn active(&self) -> &[K] {
        &self.active
    }

    /// Attached values in insertion order, skipping any checked-out value
    pub fn iter_active(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.active
            .iter()
            .filter_map(move |&key| self.get(key).map(|value| (key, value)))
    }

    /// Number of stored values
    pub fn stored_len(&self) -> usize {
        self.slots.len()
    }

    /// Temporarily move a value out so it can be updated while the rest of the
    /// registry stays readable
    pub(crate) fn checkout(&mut self, key: K) -> Option<T> {
        self.slots.get_mut(key).and_then(Option::take)
    }

    /// Return a value taken with [`checkout`](Self::checkout)
    pub(crate) fn checkin(&mut self, key: K, value: T) {
        if let Some(slot) = self.slots.get_mut(key) {
            *slot = Some(value);
        }
    }
}
