//! The world model
//!
//! Owns tiles, tile layers, static map objects, entities and HUD objects.
//! Runs the per-frame pass and answers spatial queries with a full scan.

use std::path::Path;

use log::{error, info, warn};

use super::entity::{Entity, EntityFrame, HudObject, QueryError, Scene};
use super::object::WorldObject;
use super::registry::{EntityHandle, HudHandle, Registry, WorldObjectHandle};
use super::tile::{Tile, TileLayer, EMPTY_TILE};
use crate::collision::Intersection;
use crate::config::ObjectOptions;
use crate::foundation::math::{GridPos, Vec2};
use crate::map::{
    build_hitbox, MapDescription, MapLoadError, MapLoader, ObjectDescription, TileScale,
    TilesetDescription, TilesetSource,
};
use crate::render::RenderContext;

/// Tile grid, static geometry and live entities
pub struct World {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    tiles: Vec<Tile>,
    layers: Vec<TileLayer>,
    foreground_layers: Vec<TileLayer>,
    objects: Registry<WorldObjectHandle, WorldObject>,
    entities: Registry<EntityHandle, Box<dyn Entity>>,
    hud_objects: Registry<HudHandle, Box<dyn HudObject>>,
    object_options: ObjectOptions,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::with_options(ObjectOptions::default())
    }

    /// Create an empty world with map object conversion options
    pub fn with_options(object_options: ObjectOptions) -> Self {
        Self {
            width: 0,
            height: 0,
            tile_width: 0,
            tile_height: 0,
            tiles: Vec::new(),
            layers: Vec::new(),
            foreground_layers: Vec::new(),
            objects: Registry::new("World object"),
            entities: Registry::new("Entity"),
            hud_objects: Registry::new("HUD Object"),
            object_options,
        }
    }

    /// Options used for the next map load
    pub fn set_object_options(&mut self, options: ObjectOptions) {
        self.object_options = options;
    }

    // --- Map loading -------------------------------------------------------

    /// Load a map by name through `loader`, replacing the current map.
    ///
    /// On failure the world is left without tiles, layers or objects.
    pub fn load_map(
        &mut self,
        name: &str,
        loader: &MapLoader,
        ctx: &mut RenderContext,
    ) -> Result<(), MapLoadError> {
        self.clear_map();
        let description = loader.load_map(name).map_err(|e| {
            error!("Can't load tilemap {}: {}", name, e);
            e
        })?;
        self.load_map_description(&description, loader, ctx)?;
        info!("Loaded {} tilemap", name);
        Ok(())
    }

    /// Build the world from an already parsed map, replacing the current map.
    ///
    /// Layers and objects with malformed data are skipped or lose their
    /// geometry with a warning; a missing or invalid tile set fails the load
    /// and leaves the world cleared.
    pub fn load_map_description(
        &mut self,
        description: &MapDescription,
        tilesets: &dyn TilesetSource,
        ctx: &mut RenderContext,
    ) -> Result<(), MapLoadError> {
        self.clear_map();
        if let Err(e) = self.build_map(description, tilesets, ctx) {
            error!("Map load aborted: {}", e);
            self.clear_map();
            return Err(e);
        }
        Ok(())
    }

    /// Drop tiles, layers and world objects. Entities and HUD objects stay.
    pub fn clear_map(&mut self) {
        self.width = 0;
        self.height = 0;
        self.tile_width = 0;
        self.tile_height = 0;
        self.tiles.clear();
        self.layers.clear();
        self.foreground_layers.clear();
        self.objects.clear();
    }

    fn build_map(
        &mut self,
        description: &MapDescription,
        tilesets: &dyn TilesetSource,
        ctx: &mut RenderContext,
    ) -> Result<(), MapLoadError> {
        let (width, height) = (description.width, description.height);
        if width == 0 || height == 0 || description.tile_width == 0 || description.tile_height == 0 {
            return Err(MapLoadError::InvalidGrid { width, height });
        }
        self.width = width;
        self.height = height;
        self.tile_width = description.tile_width;
        self.tile_height = description.tile_height;

        for layer_description in &description.layers {
            match TileLayer::from_description(layer_description, width, height) {
                Ok(layer) if layer_description.is_foreground() => self.foreground_layers.push(layer),
                Ok(layer) => self.layers.push(layer),
                Err(e) => warn!("Skipping layer {}: {}", layer_description.name, e),
            }
        }

        self.tiles.push(Tile::empty());
        for tileset_ref in &description.tilesets {
            let tileset = tilesets.tileset(&tileset_ref.source)?;
            self.add_tileset(tileset_ref.first_gid, &tileset_ref.source, &tileset, ctx)?;
        }

        let scale = TileScale::new(description.tile_width as f32, description.tile_height as f32);
        for group in &description.object_groups {
            for object in &group.objects {
                let world_object = self.build_object(object, &group.name, scale);
                self.objects.insert_attached(world_object);
            }
        }
        Ok(())
    }

    fn add_tileset(
        &mut self,
        first_gid: u32,
        source: &str,
        tileset: &TilesetDescription,
        ctx: &mut RenderContext,
    ) -> Result<(), MapLoadError> {
        let invalid = |reason| MapLoadError::InvalidTileset {
            source_name: source.to_string(),
            reason,
        };
        if tileset.columns == 0 {
            return Err(invalid("zero columns"));
        }
        if tileset.tile_width == 0 || tileset.tile_height == 0 {
            return Err(invalid("zero tile size"));
        }
        if first_gid == EMPTY_TILE {
            return Err(invalid("first global ID must be at least 1"));
        }
        let capacity = u64::from(tileset.image.width / tileset.tile_width)
            * u64::from(tileset.image.height / tileset.tile_height);
        if u64::from(tileset.tile_count) > capacity {
            return Err(invalid("tile count exceeds image"));
        }
        if first_gid.checked_add(tileset.tile_count).is_none() {
            return Err(invalid("global IDs overflow"));
        }

        let image = Path::new(&tileset.image.source);
        let texture_name = image.with_extension("").to_string_lossy().into_owned();
        let texture = ctx.texture(&texture_name, image);

        let first = first_gid as usize;
        let end = first + tileset.tile_count as usize;
        let taken = &self.tiles[first.min(self.tiles.len())..end.min(self.tiles.len())];
        if taken.iter().any(|tile| tile.texture().is_some()) {
            warn!("Tileset {} overlaps global IDs of an earlier tileset", source);
        }
        if self.tiles.len() < end {
            self.tiles.resize_with(end, Tile::empty);
        }
        for local_id in 0..tileset.tile_count {
            self.tiles[first + local_id as usize] = Tile::new(
                texture,
                local_id,
                tileset.tile_width,
                tileset.tile_height,
                tileset.columns,
            );
        }

        for tile_description in &tileset.tiles {
            if tile_description.id >= tileset.tile_count {
                warn!(
                    "Tile {} is outside tileset {} ({} tiles)",
                    tile_description.id, source, tileset.tile_count
                );
                continue;
            }
            self.tiles[first + tile_description.id as usize].apply_description(tile_description);
        }

        info!("Loaded {} tileset", texture_name);
        Ok(())
    }

    fn build_object(&self, object: &ObjectDescription, group: &str, scale: TileScale) -> WorldObject {
        let hitbox = build_hitbox(object, scale, self.object_options).unwrap_or_else(|e| {
            warn!(
                "Object {} in group {} has no collidable geometry: {}",
                object.name.as_deref().unwrap_or("<unnamed>"),
                group,
                e
            );
            None
        });

        let mut world_object = WorldObject::new(hitbox);
        if let Some(name) = &object.name {
            world_object.set_data("name", name.clone());
        }
        if let Some(kind) = &object.kind {
            world_object.set_data("type", kind.clone());
        }
        for property in &object.properties {
            world_object.set_data(property.name.clone(), property.value.clone());
        }
        world_object
    }

    // --- Frame pass --------------------------------------------------------

    /// Run one frame: draw layers, advance tile animations, update entities,
    /// draw foreground layers, update HUD objects.
    pub fn update(&mut self, ctx: &mut RenderContext, now_ms: u64) {
        for layer in &self.layers {
            self.draw_layer(layer, ctx);
        }

        for tile in &mut self.tiles {
            tile.advance_animation(now_ms);
        }

        self.update_entities(ctx, now_ms);

        for layer in &self.foreground_layers {
            self.draw_layer(layer, ctx);
        }

        let hud_order = self.hud_objects.active().to_vec();
        for handle in hud_order {
            if let Some(mut hud_object) = self.hud_objects.checkout(handle) {
                hud_object.update(ctx, now_ms);
                self.hud_objects.checkin(handle, hud_object);
            }
        }
    }

    fn update_entities(&mut self, ctx: &mut RenderContext, now_ms: u64) {
        let order = self.entities.active().to_vec();
        for handle in order {
            let Some(mut entity) = self.entities.checkout(handle) else {
                continue;
            };
            let mut frame = EntityFrame {
                handle,
                now_ms,
                render: &mut *ctx,
                scene: Scene {
                    entities: &self.entities,
                    objects: &self.objects,
                },
            };
            entity.update(&mut frame);
            self.entities.checkin(handle, entity);
        }
    }

    fn draw_layer(&self, layer: &TileLayer, ctx: &mut RenderContext) {
        let width = self.width as usize;
        for (index, &tile_id) in layer.tile_ids().iter().enumerate() {
            if tile_id == EMPTY_TILE {
                continue;
            }
            let Some(tile) = self.tiles.get(tile_id as usize) else {
                continue;
            };
            let Some(texture) = tile.texture() else {
                continue;
            };
            let grid = GridPos::new((index % width) as i32, (index / width) as i32);
            ctx.draw_tile(grid, tile.source_rect(), texture);
        }
    }

    // --- Spatial queries ---------------------------------------------------

    /// Every entity and world object the subject currently overlaps.
    ///
    /// Other entities are tested in insertion order, then world objects in
    /// load order. Fails on a degenerate hitbox rather than skipping it.
    pub fn query_intersections(&self, subject: EntityHandle) -> Result<Vec<Intersection>, QueryError> {
        let entity = self
            .entities
            .get(subject)
            .filter(|_| self.entities.is_attached(subject))
            .ok_or(QueryError::UnknownEntity(subject))?;
        self.scene().intersections(subject, &entity.hitbox())
    }

    /// Property of the top-most non-empty regular-layer tile under a position
    pub fn get_tile_data(&self, position: Vec2, key: &str) -> Option<&str> {
        if !(position.x >= 0.0 && position.y >= 0.0) {
            return None;
        }
        let column = position.x.floor() as u32;
        let row = position.y.floor() as u32;
        if column >= self.width || row >= self.height {
            return None;
        }
        let tile_id = self
            .layers
            .iter()
            .rev()
            .filter_map(|layer| layer.tile_at(column, row, self.width))
            .find(|&id| id != EMPTY_TILE)?;
        self.tiles.get(tile_id as usize)?.property(key)
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            entities: &self.entities,
            objects: &self.objects,
        }
    }

    // --- Entities ----------------------------------------------------------

    /// Store an entity without attaching it
    pub fn spawn_entity(&mut self, entity: Box<dyn Entity>) -> EntityHandle {
        self.entities.insert(entity)
    }

    /// Store an entity and attach it
    pub fn create_entity(&mut self, entity: Box<dyn Entity>) -> EntityHandle {
        self.entities.insert_attached(entity)
    }

    /// Attach a stored entity; a duplicate is ignored with a warning
    pub fn add_entity(&mut self, handle: EntityHandle) -> bool {
        self.entities.attach(handle)
    }

    /// Detach an entity without destroying it
    pub fn remove_entity(&mut self, handle: EntityHandle) -> Option<EntityHandle> {
        self.entities.detach(handle)
    }

    /// Detach an entity and take ownership of it back
    pub fn despawn_entity(&mut self, handle: EntityHandle) -> Option<Box<dyn Entity>> {
        self.entities.take(handle)
    }

    /// Destroy every stored entity
    pub fn delete_all_entities(&mut self) {
        self.entities.clear();
    }

    /// Stored entity
    pub fn entity(&self, handle: EntityHandle) -> Option<&dyn Entity> {
        self.entities.get(handle).map(|entity| &**entity)
    }

    /// Stored entity
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut (dyn Entity + 'static)> {
        self.entities.get_mut(handle).map(|entity| &mut **entity)
    }

    /// First attached entity with the given name
    pub fn get_entity_by_name(&self, name: &str) -> Option<EntityHandle> {
        self.entities
            .iter_active()
            .find(|(_, entity)| entity.name() == name)
            .map(|(handle, _)| handle)
    }

    /// All attached entities with the given name, in update order
    pub fn get_entities_by_name(&self, name: &str) -> Vec<EntityHandle> {
        self.entities
            .iter_active()
            .filter(|(_, entity)| entity.name() == name)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Attached entities in update order
    pub fn all_entities(&self) -> &[EntityHandle] {
        self.entities.active()
    }

    // --- HUD objects -------------------------------------------------------

    /// Store a HUD object without attaching it
    pub fn spawn_hud_object(&mut self, hud_object: Box<dyn HudObject>) -> HudHandle {
        self.hud_objects.insert(hud_object)
    }

    /// Store a HUD object and attach it
    pub fn create_hud_object(&mut self, hud_object: Box<dyn HudObject>) -> HudHandle {
        self.hud_objects.insert_attached(hud_object)
    }

    /// Attach a stored HUD object; a duplicate is ignored with a warning
    pub fn add_hud_object(&mut self, handle: HudHandle) -> bool {
        self.hud_objects.attach(handle)
    }

    /// Detach a HUD object without destroying it
    pub fn remove_hud_object(&mut self, handle: HudHandle) -> Option<HudHandle> {
        self.hud_objects.detach(handle)
    }

    /// Detach a HUD object and take ownership of it back
    pub fn despawn_hud_object(&mut self, handle: HudHandle) -> Option<Box<dyn HudObject>> {
        self.hud_objects.take(handle)
    }

    /// Destroy every stored HUD object
    pub fn delete_all_hud_objects(&mut self) {
        self.hud_objects.clear();
    }

    /// Attached HUD objects in update order
    pub fn all_hud_objects(&self) -> &[HudHandle] {
        self.hud_objects.active()
    }

    // --- Map contents ------------------------------------------------------

    /// Grid width in tiles
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile size in map pixels
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    /// Tiles indexed by global ID; index 0 is the empty tile
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile by global ID
    pub fn tile(&self, id: u32) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    /// Layers drawn before entities
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Layers drawn after entities
    pub fn foreground_layers(&self) -> &[TileLayer] {
        &self.foreground_layers
    }

    /// Static objects in load order
    pub fn world_objects(&self) -> impl Iterator<Item = (WorldObjectHandle, &WorldObject)> + '_ {
        self.objects.iter_active()
    }

    /// Static object by handle
    pub fn world_object(&self, handle: WorldObjectHandle) -> Option<&WorldObject> {
        self.objects.get(handle)
    }
}
