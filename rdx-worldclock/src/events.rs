//! Defines all public event types broadcast by the worldclock engine.
//!
//! Listeners subscribe to these strongly-typed streams instead of polling the
//! registry.

use crate::common::{ClockId, UtcOffsetHours};
use crate::time::{DisplayTime, WallClock};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// Published by a clock's ticker on every tick.
#[derive(Debug, Clone)]
pub struct TickEvent {
    pub clock: ClockId,
    pub name: String,
    pub offset: UtcOffsetHours,
    pub wall: WallClock,
    pub display: DisplayTime,
    /// The UTC instant the reading was taken from.
    pub timestamp: DateTime<Utc>,
}

/// Events related to the engine and its clock list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    /// Fired once when `run` begins.
    EngineStarted,
    /// Fired once the engine has unmounted every ticker.
    EngineShutdown,
    /// A clock was appended and its ticker mounted.
    ClockAdded { id: ClockId, position: usize },
    /// A clock was removed and its ticker released.
    ClockRemoved { id: ClockId, position: usize },
}

/// Waits for the next event, skipping over any the receiver fell behind on.
///
/// Returns `None` only once the channel is closed.
pub async fn next_event<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Option<T> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Listener lagged; skipped {} event(s).", skipped)
            }
            Err(RecvError::Closed) => return None,
        }
    }
}
