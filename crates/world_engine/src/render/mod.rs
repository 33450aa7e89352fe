//! Rendering interface
//!
//! Presentation is owned by the host. The world only records draw commands
//! and reads camera state through an explicit [`RenderContext`].

pub mod commands;
pub mod context;

pub use commands::{DrawCommand, ScreenRect, SourceRect, TextureHandle};
pub use context::{Camera2D, RenderContext, Viewport};
