//! The per-clock periodic task.

use crate::common::ClockId;
use crate::events::TickEvent;
use crate::registry::ClockRegistry;
use crate::time::{DisplayTime, TimeSource, WallClock};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

/// Owns the timer of one displayed clock.
///
/// Mounting spawns the task; dropping the ticker aborts it. A tick that runs
/// after its clock left the registry publishes nothing and ends the task.
#[doc(hidden)]
pub(crate) struct ClockTicker {
    id: ClockId,
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawns the ticker. The first tick fires immediately.
    pub(crate) fn mount(
        id: ClockId,
        period: Duration,
        registry: Arc<RwLock<ClockRegistry>>,
        time_source: Arc<dyn TimeSource>,
        tick_sender: broadcast::Sender<TickEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(event) = Self::read(id, &registry, time_source.as_ref()).await else {
                    trace!(?id, "Clock no longer registered; ticker exiting.");
                    break;
                };
                trace!(
                    ?id,
                    "Tick {:02}:{:02}:{:02}",
                    event.wall.hours,
                    event.wall.minutes,
                    event.wall.seconds
                );
                tick_sender.send(event).ok();
            }
        });
        Self { id, handle }
    }

    async fn read(
        id: ClockId,
        registry: &RwLock<ClockRegistry>,
        time_source: &dyn TimeSource,
    ) -> Option<TickEvent> {
        let registry = registry.read().await;
        let config = registry.get(id)?;
        let now = time_source.now();
        let wall = WallClock::at(now, config.offset);
        Some(TickEvent {
            clock: id,
            name: config.name.clone(),
            offset: config.offset,
            wall,
            display: DisplayTime::from_wall_clock(&wall),
            timestamp: now,
        })
    }

    pub(crate) fn id(&self) -> ClockId {
        self.id
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
