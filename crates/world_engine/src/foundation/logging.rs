//! Logging utilities and structured logging support
//!
//! Every subsystem logs through the `log` facade; the record target is the
//! emitting module path, which identifies the subsystem in the output.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from the `RUST_LOG` environment variable
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter string (e.g. `"info,world_engine::world=debug"`)
///
/// `RUST_LOG`, when set, takes precedence over `filter`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_with_filter(filter: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(filter);
    if let Ok(env_filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&env_filter);
    }
    let _ = builder.try_init();
}
