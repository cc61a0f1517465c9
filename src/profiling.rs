//! # Profiling Guide
//!
//! Gadget ECS emits `tracing` spans around spawning, entity and world
//! teardown, and `collect()` when the `profiling` feature is enabled.
//!
//! ## Basic Usage
//!
//! Enable the `profiling` feature in your Cargo.toml:
//!
//! ```toml
//! [dependencies]
//! gadget_ecs = { version = "0.3", features = ["profiling"] }
//! ```
//!
//! Then install a subscriber before building worlds:
//!
//! ```ignore
//! let _guard = gadget_ecs::profiling::init_file_tracing("trace.json")?;
//!
//! let mut world = World::new();
//! // world.spawn / world.collect now record spans
//! ```
//!
//! Spans recorded:
//!
//! | Span | Fields |
//! |---|---|
//! | `world.spawn` | `world` |
//! | `world.destroy_entity` | `entity` |
//! | `world.collect` | `world` |
//! | `world.destroy` | `entities`, `queries` |
//!
//! ## Collecting Metrics
//!
//! Population counters go through a [`Monitor`](crate::monitor::Monitor)
//! configured on the [`WorldBuilder`](crate::world::WorldBuilder):
//!
//! ```ignore
//! let monitor = CountingMonitor::new();
//! let mut world = World::builder().monitor(monitor.clone()).build();
//! world.spawn(())?;
//! assert_eq!(monitor.get(ENTITY_MONITOR), 1);
//! ```
//!
//! ## Performance Tips
//!
//! 1. Profile in release mode for accurate metrics
//! 2. Use `RUST_LOG=debug` to see all spans
//! 3. Disable `checked` in release builds to drop the reentrancy guard

#[cfg(feature = "profiling")]
pub use file_tracing::init_file_tracing;

#[cfg(feature = "profiling")]
mod file_tracing {
    use std::fs::File;
    use std::path::Path;

    use tracing_appender::non_blocking::WorkerGuard;

    use crate::error::{EcsError, Result};

    /// Install a global JSON subscriber writing every span and event to
    /// `path`.
    ///
    /// Keep the returned guard alive for as long as events should be
    /// flushed. Fails if the file cannot be created or a global subscriber is
    /// already set.
    pub fn init_file_tracing(path: impl AsRef<Path>) -> Result<WorkerGuard> {
        let file = File::create(path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .try_init()
            .map_err(|err| EcsError::IoError(err.to_string()))?;

        Ok(guard)
    }
}
