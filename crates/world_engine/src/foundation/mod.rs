//! Foundation module - Core utilities and types
//!
//! - Math types and geometric helpers
//! - Time sources for tile animation
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
