//! Time sources and the pure time-to-angle computation.
//!
//! Everything here is synchronous and side-effect free apart from reading a
//! `TimeSource`. The tickers call [`DisplayTime::at`] once per tick.

use crate::common::UtcOffsetHours;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// A source of the current UTC instant.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven time source for tests and reproducible demos.
///
/// Stores milliseconds since the Unix epoch.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    millis: AtomicI64,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis
            .store(instant.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn advance(&self, duration: std::time::Duration) {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(millis, Ordering::Relaxed);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::Relaxed)).unwrap_or_default()
    }
}

/// Wall-clock reading at a fixed offset from UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub millis: u32,
}

impl WallClock {
    /// Decomposes `now` shifted by `offset` into time of day.
    ///
    /// Plain modulo-24 arithmetic on milliseconds; no zone rules apply.
    pub fn at(now: DateTime<Utc>, offset: UtcOffsetHours) -> Self {
        let target_millis = now.timestamp_millis() + offset.hours() * MILLIS_PER_HOUR;
        let of_day = target_millis.rem_euclid(MILLIS_PER_DAY);
        Self {
            hours: (of_day / MILLIS_PER_HOUR) as u32,
            minutes: (of_day % MILLIS_PER_HOUR / MILLIS_PER_MINUTE) as u32,
            seconds: (of_day % MILLIS_PER_MINUTE / MILLIS_PER_SECOND) as u32,
            millis: (of_day % MILLIS_PER_SECOND) as u32,
        }
    }
}

/// Rotation of the three hands, in degrees clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTime {
    pub hour_angle_deg: f64,
    pub minute_angle_deg: f64,
    pub second_angle_deg: f64,
}

impl DisplayTime {
    /// Computes the hand angles for `now` at `offset`.
    pub fn at(now: DateTime<Utc>, offset: UtcOffsetHours) -> Self {
        Self::from_wall_clock(&WallClock::at(now, offset))
    }

    /// Every hand advances continuously within its period. The hour hand
    /// uses `hours % 12`, so it never passes 360 degrees.
    pub fn from_wall_clock(wall: &WallClock) -> Self {
        let hours = f64::from(wall.hours % 12);
        let minutes = f64::from(wall.minutes);
        let seconds = f64::from(wall.seconds);
        let fractional_seconds = seconds + f64::from(wall.millis) / 1000.0;

        Self {
            hour_angle_deg: hours * 30.0 + (minutes / 60.0) * 30.0,
            minute_angle_deg: minutes * 6.0 + (seconds / 60.0) * 6.0,
            second_angle_deg: fractional_seconds * 6.0,
        }
    }
}
