use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use worldclock::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the configuration. The first argument, if any, is a TOML file.
    let path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = WorldClockConfig::load(path.as_deref())?;
    if config.clocks.is_empty() {
        config.clocks = vec![
            ClockPreset {
                name: "UTC".to_string(),
                offset: 0,
            },
            ClockPreset {
                name: "Tokyo".to_string(),
                offset: 9,
            },
        ];
    }

    // 3. Create the engine.
    let engine = WorldClockEngine::new(config);

    // 4. Spawn listeners for both event streams.
    spawn_event_listeners(&engine);

    // 5. Run the engine until Ctrl+C.
    engine.run().await?;

    Ok(())
}

/// Spawns one task per event stream, logging what the engine publishes.
fn spawn_event_listeners(engine: &WorldClockEngine) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Some(event) = next_event(&mut system_rx).await {
            info!("[SYSTEM] => {:?}", event);
        }
    });

    let mut tick_rx = engine.subscribe_tick_events();
    tokio::spawn(async move {
        while let Some(tick) = next_event(&mut tick_rx).await {
            info!(
                "[TICK] {} ({}) {:02}:{:02}:{:02} => hour {:.1}°, minute {:.1}°, second {:.1}°",
                tick.name,
                tick.offset,
                tick.wall.hours,
                tick.wall.minutes,
                tick.wall.seconds,
                tick.display.hour_angle_deg,
                tick.display.minute_angle_deg,
                tick.display.second_angle_deg,
            );
        }
    });
}
