//! Map demo
//!
//! Loads a tile map, drops a handful of crates and a walking player into it,
//! and runs a fixed number of frames. Collisions are resolved by pushing each
//! entity out along its minimum translation vector.
//!
//! Usage: `map_demo [config.toml|config.ron] [map name]`

use std::error::Error;
use std::time::Duration;

use log::{debug, error, info, warn};
use rand::prelude::*;
use world_engine::foundation::logging;
use world_engine::prelude::*;

const FRAMES: u32 = 120;
const FRAME_TIME: Duration = Duration::from_millis(16);
const CRATE_COUNT: usize = 6;
const CRATE_SEED: u64 = 7;
const WINDOW_SIZE: (u32, u32) = (1280, 720);

/// Pushable box that settles out of anything it overlaps
struct Crate {
    hitbox: Hitbox,
}

impl Entity for Crate {
    fn name(&self) -> &str {
        "crate"
    }

    fn hitbox(&self) -> Hitbox {
        self.hitbox.clone()
    }

    fn update(&mut self, frame: &mut EntityFrame<'_>) {
        match frame.intersections(&self.hitbox) {
            Ok(hits) => {
                for hit in hits.iter().filter(|hit| hit.world_object().is_some()) {
                    self.hitbox.translate(hit.resolution());
                }
            }
            Err(e) => warn!("Crate skipped collision this frame: {}", e),
        }
    }
}

/// Walks right until blocked, then turns around
struct Player {
    hitbox: Hitbox,
    speed: f32,
    last_ms: Option<u64>,
}

impl Entity for Player {
    fn name(&self) -> &str {
        "player"
    }

    fn hitbox(&self) -> Hitbox {
        self.hitbox.clone()
    }

    fn update(&mut self, frame: &mut EntityFrame<'_>) {
        let now = frame.now_ms();
        let elapsed = self.last_ms.map_or(0, |last| now.saturating_sub(last));
        self.last_ms = Some(now);
        self.hitbox.translate(Vec2::new(self.speed * elapsed as f32 / 1000.0, 0.0));

        let hits = match frame.intersections(&self.hitbox) {
            Ok(hits) => hits,
            Err(e) => {
                error!("Player collision query failed: {}", e);
                return;
            }
        };
        for hit in &hits {
            if hit.penetration_depth > 0.0 && hit.mtv.x.abs() > hit.mtv.y.abs() {
                self.speed = -self.speed;
            }
            self.hitbox.translate(hit.resolution());
            match hit.other {
                Counterpart::Entity(handle) => {
                    let name = frame.entity(handle).map_or("?", |entity| entity.name());
                    debug!("Player bumped {} by {:.3}", name, hit.penetration_depth);
                }
                Counterpart::WorldObject(handle) => {
                    let name = frame
                        .world_object(handle)
                        .and_then(|object| object.get_data("name"))
                        .unwrap_or("?");
                    debug!("Player hit {} by {:.3}", name, hit.penetration_depth);
                }
            }
        }

        let center = self.hitbox.center();
        frame.render().set_camera_position(center);
    }
}

/// Reports the number of queued draws each second
struct DrawCounter {
    next_report_ms: u64,
}

impl HudObject for DrawCounter {
    fn update(&mut self, render: &mut RenderContext, now_ms: u64) {
        if now_ms >= self.next_report_ms {
            info!("{} draws queued, camera at {:?}", render.commands().len(), render.camera().position);
            self.next_report_ms = now_ms + 1000;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    let map_name = args.next().unwrap_or_else(|| "level1".to_string());

    logging::init_with_filter(&config.logging.filter);
    info!("Starting map demo with {}", map_name);

    let loader = MapLoader::from_config(&config.assets);
    let mut ctx = RenderContext::new(Viewport::new(16.0, 9.0));
    let mut world = World::with_options(config.objects);
    world.load_map(&map_name, &loader, &mut ctx)?;

    let mut rng = StdRng::seed_from_u64(CRATE_SEED);
    if world.width() > 2 && world.height() > 2 {
        for _ in 0..CRATE_COUNT {
            let x = rng.gen_range(1.0..world.width() as f32 - 1.0);
            let y = rng.gen_range(1.0..world.height() as f32 - 1.0);
            world.create_entity(Box::new(Crate {
                hitbox: Hitbox::square(Vec2::new(x, y), 0.8),
            }));
        }
    } else {
        warn!("Map {}x{} is too small for crates", world.width(), world.height());
    }
    let player = world.create_entity(Box::new(Player {
        hitbox: Hitbox::circle(Vec2::new(1.0, 4.0), 0.4),
        speed: 3.0,
        last_ms: None,
    }));
    world.create_hud_object(Box::new(DrawCounter { next_report_ms: 0 }));

    let clock = SystemClock::new();
    for _ in 0..FRAMES {
        world.update(&mut ctx, clock.now_ms());
        let commands = ctx.drain_commands();
        let on_screen = commands
            .iter()
            .filter(|DrawCommand::Tile { grid, .. }| {
                let rect = ctx.tile_screen_rect(*grid, WINDOW_SIZE.0, WINDOW_SIZE.1);
                rect.x + rect.width > 0
                    && rect.y + rect.height > 0
                    && rect.x < WINDOW_SIZE.0 as i32
                    && rect.y < WINDOW_SIZE.1 as i32
            })
            .count();
        debug!("Frame presented {} of {} draw commands", on_screen, commands.len());
        std::thread::sleep(FRAME_TIME);
    }

    for handle in world.all_entities() {
        let hits = world.query_intersections(*handle)?;
        if !hits.is_empty() {
            warn!("Entity {:?} still overlaps {} things", handle, hits.len());
        }
    }
    if let Some(entity) = world.entity(player) {
        info!("Player finished at {:?}", entity.hitbox().center());
    }
    Ok(())
}
