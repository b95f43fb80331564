//! Contains the building blocks the engine mounts for each displayed clock.
//!
//! A `ClockTicker` drives one clock's once-per-second recomputation, and the
//! `face` module turns the resulting hand angles into a drawable dial.

pub mod face;
pub mod ticker;
