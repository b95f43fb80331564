//! # Worldclock
//!
//! An event-driven world clock engine for Rust.
//!
//! Worldclock keeps an ordered list of named clocks, each at a fixed whole-hour
//! offset from UTC, and recomputes the three analog hand angles of every clock
//! once per second.
//!
//! ## Core Concepts
//!
//! - **ClockRegistry**: the ordered list of configured clocks. Insertion order
//!   is display order; every clock also gets a stable `ClockId`.
//! - **Time engine**: pure functions that turn a UTC instant and an offset into
//!   a `WallClock` reading and a `DisplayTime` (hand angles in degrees).
//! - **Tickers**: each registered clock owns one periodic task. Removing the
//!   clock releases the task.
//! - **Event-Driven**: readings are published as `TickEvent`s and list changes
//!   as `SystemEvent`s on broadcast channels.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use worldclock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = WorldClockEngine::new(WorldClockConfig::default());
//!
//!     let mut ticks = engine.subscribe_tick_events();
//!     tokio::spawn(async move {
//!         while let Ok(tick) = ticks.recv().await {
//!             println!("{}: {:?}", tick.name, tick.display);
//!         }
//!     });
//!
//!     engine.add_clock("Tokyo", 9).await?;
//!
//!     // Runs until Ctrl+C.
//!     engine.run().await?;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "World Clock";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod events;
pub mod form;
pub mod registry;
pub mod time;

/// A prelude module for easy importing of the most common worldclock types.
pub mod prelude {
    pub use crate::common::{ClockId, UtcOffsetHours};
    pub use crate::components::face::render_face;
    pub use crate::config::{ClockPreset, WorldClockConfig};
    pub use crate::engine::WorldClockEngine;
    pub use crate::events::{next_event, SystemEvent, TickEvent};
    pub use crate::form::ClockForm;
    pub use crate::registry::{ClockConfig, ClockRegistry, RegistryError};
    pub use crate::time::{
        DisplayTime, ManualTimeSource, SystemTimeSource, TimeSource, WallClock,
    };
}
