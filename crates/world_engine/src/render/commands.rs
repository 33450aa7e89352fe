//! Draw commands issued by the world
//!
//! The world never presents anything itself. It records commands into the
//! [`RenderContext`](super::RenderContext) and the host drains and executes
//! them with whatever backend it owns.

use crate::foundation::math::GridPos;

/// Opaque handle to a texture registered with the render context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    /// Raw index, stable for the lifetime of the render context
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Pixel rectangle inside a texture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourceRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SourceRect {
    /// Create a new rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// Destination rectangle in window pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

/// A single draw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Draw part of a texture into one grid cell
    Tile {
        /// Cell in tile coordinates (column, row)
        grid: GridPos,
        /// Region of the texture to draw
        source: SourceRect,
        /// Texture to sample
        texture: TextureHandle,
    },
}
