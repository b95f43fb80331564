//! Defines all configuration structures for the worldclock engine.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde` and the `config` crate. Environment
//! variables prefixed with `WORLDCLOCK_` override file values.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// The top-level configuration for the `WorldClockEngine`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldClockConfig {
    /// Period of each clock's ticker, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Capacity of the broadcast channels.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Radius, in rows, of the rendered analog face.
    #[serde(default = "default_face_radius")]
    pub face_radius: usize,

    /// Clocks mounted when the engine starts.
    #[serde(default)]
    pub clocks: Vec<ClockPreset>,
}

/// A clock listed in the configuration file.
///
/// The offset is kept as a raw integer so that one bad entry is skipped at
/// mount time instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockPreset {
    pub name: String,
    #[serde(default)]
    pub offset: i64,
}

impl WorldClockConfig {
    /// Loads configuration from an optional TOML file plus `WORLDCLOCK_*`
    /// environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("WORLDCLOCK"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

// --- Default value functions for serde ---

fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_channel_capacity() -> usize {
    64
}

fn default_face_radius() -> usize {
    5
}

impl Default for WorldClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            channel_capacity: default_channel_capacity(),
            face_radius: default_face_radius(),
            clocks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_yields_defaults() {
        let config = WorldClockConfig::from_toml_str("").unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.face_radius, 5);
        assert!(config.clocks.is_empty());
    }

    #[test]
    fn reads_presets_in_order() {
        let config = WorldClockConfig::from_toml_str(
            r#"
            tick_interval_ms = 500

            [[clocks]]
            name = "Tokyo"
            offset = 9

            [[clocks]]
            name = "Reykjavik"
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(
            config.clocks,
            vec![
                ClockPreset {
                    name: "Tokyo".into(),
                    offset: 9
                },
                ClockPreset {
                    name: "Reykjavik".into(),
                    offset: 0
                },
            ]
        );
    }
}
