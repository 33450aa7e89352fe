//! Explicit render context
//!
//! Created by the host at startup and passed into world loading and every
//! frame. Holds camera and viewport state, the texture name registry and the
//! queue of pending draw commands.
//!
//! Camera and viewport are in tile units. The camera position sits at the
//! center of the window and the viewport stretches over the whole window.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;

use super::commands::{DrawCommand, ScreenRect, SourceRect, TextureHandle};
use crate::foundation::math::{GridPos, Vec2};

/// 2D camera in tile units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    /// World position shown at the center of the window
    pub position: Vec2,
}

/// Visible area in tiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Tiles across
    pub width: f32,
    /// Tiles down
    pub height: f32,
}

impl Viewport {
    /// Create a viewport of the given size in tiles
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(16.0, 9.0)
    }
}

/// Render state passed explicitly through the frame
#[derive(Debug, Default)]
pub struct RenderContext {
    camera: Camera2D,
    viewport: Viewport,
    texture_names: HashMap<String, TextureHandle>,
    texture_paths: Vec<PathBuf>,
    commands: Vec<DrawCommand>,
}

impl RenderContext {
    /// Create a context for a viewport
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Current camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Replace the camera
    pub fn set_camera(&mut self, camera: Camera2D) {
        self.camera = camera;
    }

    /// Move the camera
    pub fn set_camera_position(&mut self, position: Vec2) {
        self.camera.position = position;
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the viewport
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Window rectangle a grid cell covers for a window of the given pixel size.
    ///
    /// Edges are rounded up to whole pixels, so neighbouring cells never leave gaps.
    pub fn tile_screen_rect(&self, grid: GridPos, window_width: u32, window_height: u32) -> ScreenRect {
        let (window_width, window_height) = (window_width as f32, window_height as f32);
        let Viewport { width, height } = self.viewport;
        let camera = self.camera.position;
        ScreenRect {
            x: ((grid.x as f32 - camera.x + width / 2.0) * window_width / width).ceil() as i32,
            y: ((grid.y as f32 - camera.y + height / 2.0) * window_height / height).ceil() as i32,
            width: (window_width / width).ceil() as i32,
            height: (window_height / height).ceil() as i32,
        }
    }

    /// Handle for a named texture, registering `path` the first time the name is seen
    pub fn texture(&mut self, name: &str, path: impl AsRef<Path>) -> TextureHandle {
        if let Some(&handle) = self.texture_names.get(name) {
            return handle;
        }
        let handle = TextureHandle(u32::try_from(self.texture_paths.len()).unwrap_or(u32::MAX));
        self.texture_paths.push(path.as_ref().to_path_buf());
        self.texture_names.insert(name.to_string(), handle);
        debug!("Registered texture {} -> {:?}", name, handle);
        handle
    }

    /// File the host should load for a texture handle
    pub fn texture_path(&self, handle: TextureHandle) -> Option<&Path> {
        self.texture_paths.get(handle.0 as usize).map(PathBuf::as_path)
    }

    /// Number of registered textures
    pub fn texture_count(&self) -> usize {
        self.texture_paths.len()
    }

    /// Queue a tile draw
    pub fn draw_tile(&mut self, grid: GridPos, source: SourceRect, texture: TextureHandle) {
        self.commands.push(DrawCommand::Tile { grid, source, texture });
    }

    /// Commands queued so far this frame
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take all queued commands, leaving the queue empty
    pub fn drain_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}
