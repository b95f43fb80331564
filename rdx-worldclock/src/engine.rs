//! The core engine that owns the clock list and the tickers driving it.

use crate::common::ClockId;
use crate::components::ticker::ClockTicker;
use crate::config::WorldClockConfig;
use crate::events::{SystemEvent, TickEvent};
use crate::registry::{ClockConfig, ClockRegistry, RegistryError};
use crate::time::{DisplayTime, SystemTimeSource, TimeSource, WallClock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

/// The main worldclock engine.
///
/// This struct is the central point of control. It holds the configuration,
/// the ordered clock registry and one ticker per registered clock. The engine
/// is designed to be cloned and shared across tasks, providing a handle to the
/// running instance.
#[derive(Clone)]
pub struct WorldClockEngine {
    config: Arc<WorldClockConfig>,
    time_source: Arc<dyn TimeSource>,
    registry: Arc<RwLock<ClockRegistry>>,
    tickers: Arc<Mutex<HashMap<ClockId, ClockTicker>>>,
    tick_sender: broadcast::Sender<TickEvent>,
    system_event_sender: broadcast::Sender<SystemEvent>,
}

// Core implementation block for internal logic.
impl WorldClockEngine {
    /// Creates a new engine reading the system clock.
    pub fn new(config: WorldClockConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Creates a new engine reading time from `time_source`.
    pub fn with_time_source(config: WorldClockConfig, time_source: Arc<dyn TimeSource>) -> Self {
        let capacity = config.channel_capacity.max(1);
        let (tick_sender, _) = broadcast::channel(capacity);
        let (system_event_sender, _) = broadcast::channel(capacity);

        Self {
            config: Arc::new(config),
            time_source,
            registry: Arc::new(RwLock::new(ClockRegistry::new())),
            tickers: Arc::new(Mutex::new(HashMap::new())),
            tick_sender,
            system_event_sender,
        }
    }

    /// Runs the engine until a shutdown signal is received.
    ///
    /// This method will:
    /// 1. Mount every clock listed in the configuration.
    /// 2. Wait for a Ctrl+C signal.
    /// 3. Unmount all tickers.
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("WorldClockEngine starting up...");
        self.system_event_sender
            .send(SystemEvent::EngineStarted)
            .ok();
        let mounted = self.mount_presets().await;
        info!(
            "Engine running with {} clock(s), ticking every {:?}. Press Ctrl+C to shut down.",
            mounted,
            self.config.tick_interval()
        );

        tokio::signal::ctrl_c().await?;

        info!("Shutdown signal received.");
        self.shutdown().await;
        Ok(())
    }

    /// Releases every ticker. The clock list itself is left untouched.
    pub async fn shutdown(&self) {
        let released: Vec<ClockTicker> =
            self.tickers.lock().await.drain().map(|(_, t)| t).collect();
        debug!("Releasing {} ticker(s).", released.len());
        drop(released);
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("WorldClockEngine has shut down.");
    }

    #[doc(hidden)]
    async fn mount_ticker(&self, id: ClockId) {
        let ticker = ClockTicker::mount(
            id,
            self.config.tick_interval(),
            self.registry.clone(),
            self.time_source.clone(),
            self.tick_sender.clone(),
        );
        if let Some(stale) = self.tickers.lock().await.insert(ticker.id(), ticker) {
            warn!(id = ?stale.id(), "Replaced a ticker that was still mounted.");
        }
    }

    #[doc(hidden)]
    async fn unmount_ticker(&self, id: ClockId) {
        if self.tickers.lock().await.remove(&id).is_none() {
            warn!(?id, "Removed a clock that had no ticker.");
        }
    }
}

// Public API implementation block.
impl WorldClockEngine {
    /// Appends a clock and mounts its ticker.
    ///
    /// The registry is updated before this returns; there is no deferred
    /// mutation. The ticker is mounted under the same write lock, so a
    /// concurrent removal always finds it.
    pub async fn add_clock(
        &self,
        name: impl Into<String>,
        offset_hours: i64,
    ) -> Result<ClockId, RegistryError> {
        let (id, position) = {
            let mut registry = self.registry.write().await;
            let id = registry.add(name, offset_hours)?;
            self.mount_ticker(id).await;
            (id, registry.len() - 1)
        };
        info!(?id, position, "Clock added at UTC{:+}.", offset_hours);
        self.system_event_sender
            .send(SystemEvent::ClockAdded { id, position })
            .ok();
        Ok(id)
    }

    /// Removes the clock at `position` and releases its ticker.
    ///
    /// Returns `None` and changes nothing if `position` is out of bounds.
    pub async fn remove_clock(&self, position: usize) -> Option<(ClockId, ClockConfig)> {
        let (id, config) = {
            let mut registry = self.registry.write().await;
            let removed = registry.remove(position)?;
            self.unmount_ticker(removed.0).await;
            removed
        };
        info!(?id, position, "Clock '{}' removed.", config.name);
        self.system_event_sender
            .send(SystemEvent::ClockRemoved { id, position })
            .ok();
        Some((id, config))
    }

    /// Removes a clock by its stable id and releases its ticker.
    pub async fn remove_clock_by_id(&self, id: ClockId) -> Option<ClockConfig> {
        let (position, config) = {
            let mut registry = self.registry.write().await;
            let position = registry.position_of(id)?;
            let config = registry.remove_by_id(id)?;
            self.unmount_ticker(id).await;
            (position, config)
        };
        info!(?id, position, "Clock '{}' removed.", config.name);
        self.system_event_sender
            .send(SystemEvent::ClockRemoved { id, position })
            .ok();
        Some(config)
    }

    /// Adds every clock listed in the configuration.
    ///
    /// Invalid presets are logged and skipped. Returns how many were mounted.
    pub async fn mount_presets(&self) -> usize {
        let mut mounted = 0;
        for preset in &self.config.clocks {
            match self.add_clock(preset.name.clone(), preset.offset).await {
                Ok(_) => mounted += 1,
                Err(e) => warn!("Skipping configured clock '{}': {}", preset.name, e),
            }
        }
        mounted
    }

    /// An ordered snapshot of the configured clocks.
    pub async fn list_clocks(&self) -> Vec<(ClockId, ClockConfig)> {
        self.registry.read().await.list()
    }

    /// Computes the current reading of one clock on demand.
    pub async fn display_time(&self, id: ClockId) -> Option<(WallClock, DisplayTime)> {
        let offset = self.registry.read().await.get(id)?.offset;
        let wall = WallClock::at(self.time_source.now(), offset);
        Some((wall, DisplayTime::from_wall_clock(&wall)))
    }

    /// Number of tickers currently mounted and still running.
    pub async fn active_tickers(&self) -> usize {
        self.tickers
            .lock()
            .await
            .values()
            .filter(|ticker| !ticker.is_finished())
            .count()
    }

    pub fn config(&self) -> &WorldClockConfig {
        &self.config
    }

    /// Subscribes to the `TickEvent` stream.
    pub fn subscribe_tick_events(&self) -> broadcast::Receiver<TickEvent> {
        self.tick_sender.subscribe()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClockPreset;
    use crate::time::ManualTimeSource;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn engine_at(h: u32, m: u32, s: u32) -> (WorldClockEngine, Arc<ManualTimeSource>) {
        let source = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap(),
        ));
        let engine =
            WorldClockEngine::with_time_source(WorldClockConfig::default(), source.clone());
        (engine, source)
    }

    #[tokio::test(start_paused = true)]
    async fn add_mounts_exactly_one_ticker_per_clock() {
        let (engine, _) = engine_at(0, 0, 0);
        let mut system_rx = engine.subscribe_system_events();

        let id = engine.add_clock("Tokyo", 9).await.unwrap();
        engine.add_clock("Lima", -5).await.unwrap();

        assert_eq!(engine.active_tickers().await, 2);
        assert_eq!(
            system_rx.recv().await.unwrap(),
            SystemEvent::ClockAdded { id, position: 0 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_add_leaves_no_trace() {
        let (engine, _) = engine_at(0, 0, 0);
        assert_eq!(engine.add_clock("", 5).await, Err(RegistryError::EmptyName));
        assert_eq!(
            engine.add_clock("Mars", 14).await,
            Err(RegistryError::OffsetOutOfRange(14))
        );
        assert!(engine.list_clocks().await.is_empty());
        assert_eq!(engine.active_tickers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_releases_the_ticker() {
        let (engine, _) = engine_at(0, 0, 0);
        engine.add_clock("A", 1).await.unwrap();
        let b = engine.add_clock("B", 2).await.unwrap();

        let (_, removed) = engine.remove_clock(0).await.unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(engine.active_tickers().await, 1);
        assert_eq!(engine.list_clocks().await[0].0, b);

        assert!(engine.remove_clock(5).await.is_none());
        assert_eq!(engine.remove_clock_by_id(b).await.map(|c| c.name), Some("B".into()));
        assert_eq!(engine.active_tickers().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn display_time_reflects_the_offset() {
        let (engine, source) = engine_at(22, 30, 0);
        let id = engine.add_clock("Moscow", 3).await.unwrap();

        let (wall, display) = engine.display_time(id).await.unwrap();
        assert_eq!((wall.hours, wall.minutes), (1, 30));
        assert_eq!(display.hour_angle_deg, 45.0);

        source.advance(Duration::from_secs(15));
        let (wall, _) = engine.display_time(id).await.unwrap();
        assert_eq!(wall.seconds, 15);
    }

    #[tokio::test(start_paused = true)]
    async fn presets_with_bad_values_are_skipped() {
        let config = WorldClockConfig {
            clocks: vec![
                ClockPreset { name: "Tokyo".into(), offset: 9 },
                ClockPreset { name: "Nowhere".into(), offset: 40 },
                ClockPreset { name: "".into(), offset: 0 },
                ClockPreset { name: "London".into(), offset: 0 },
            ],
            ..WorldClockConfig::default()
        };
        let engine = WorldClockEngine::new(config);

        assert_eq!(engine.mount_presets().await, 2);
        let names: Vec<String> = engine
            .list_clocks()
            .await
            .into_iter()
            .map(|(_, c)| c.name)
            .collect();
        assert_eq!(names, vec!["Tokyo", "London"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_releases_everything_but_keeps_the_list() {
        let (engine, _) = engine_at(0, 0, 0);
        engine.add_clock("A", 0).await.unwrap();
        let mut system_rx = engine.subscribe_system_events();

        engine.shutdown().await;

        assert_eq!(engine.active_tickers().await, 0);
        assert_eq!(engine.list_clocks().await.len(), 1);
        assert_eq!(system_rx.recv().await.unwrap(), SystemEvent::EngineShutdown);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_add_and_remove_leave_no_orphan_tickers() {
        let (engine, _) = engine_at(0, 0, 0);
        let mut tasks = Vec::new();
        for n in 0..50 {
            let adder = engine.clone();
            let remover = engine.clone();
            tasks.push(tokio::spawn(async move {
                adder.add_clock(format!("clock {n}"), 0).await.ok();
            }));
            tasks.push(tokio::spawn(async move {
                remover.remove_clock(0).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let registered = engine.list_clocks().await.len();
        let tickers = engine.tickers.lock().await;
        assert_eq!(tickers.len(), registered);
        let registry = engine.registry.read().await;
        assert!(tickers.keys().all(|&id| registry.get(id).is_some()));
    }
}
