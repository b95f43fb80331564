//! Contains common, primitive types shared across the worldclock crate.
//!
//! This module defines the stable `ClockId` key and the `UtcOffsetHours`
//! newtype. Using distinct types keeps an unvalidated integer from ever
//! reaching the time engine.

use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Uniquely and safely identifies a configured clock.
    ///
    /// The key is assigned when the clock is added and is never reused, so a
    /// ticker or event that refers to a removed clock can't accidentally
    /// resolve to a clock added later at the same position.
    pub struct ClockId;
}

/// Smallest accepted offset, in hours.
pub const MIN_OFFSET_HOURS: i64 = -12;
/// Largest accepted offset, in hours.
pub const MAX_OFFSET_HOURS: i64 = 12;

/// A whole number of hours added to UTC, guaranteed to be in `[-12, 12]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtcOffsetHours(i8);

impl UtcOffsetHours {
    /// UTC itself.
    pub const ZERO: Self = Self(0);

    /// Returns the offset if `hours` is within `[-12, 12]`.
    pub fn new(hours: i64) -> Option<Self> {
        if (MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS).contains(&hours) {
            Some(Self(hours as i8))
        } else {
            None
        }
    }

    pub fn hours(self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for UtcOffsetHours {
    type Error = String;

    fn try_from(hours: i64) -> Result<Self, Self::Error> {
        Self::new(hours).ok_or_else(|| {
            format!("offset {hours} is outside [{MIN_OFFSET_HOURS}, {MAX_OFFSET_HOURS}]")
        })
    }
}

impl fmt::Display for UtcOffsetHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UTC{:+}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_whole_range_and_nothing_else() {
        for hours in MIN_OFFSET_HOURS..=MAX_OFFSET_HOURS {
            assert_eq!(UtcOffsetHours::new(hours).map(|o| o.hours()), Some(hours));
        }
        assert!(UtcOffsetHours::new(13).is_none());
        assert!(UtcOffsetHours::new(-13).is_none());
        assert!(UtcOffsetHours::new(i64::MAX).is_none());
    }

    #[test]
    fn try_from_reports_the_accepted_range() {
        assert_eq!(UtcOffsetHours::try_from(-12_i64).map(UtcOffsetHours::hours), Ok(-12));
        assert_eq!(
            UtcOffsetHours::try_from(14_i64),
            Err("offset 14 is outside [-12, 12]".to_string())
        );
    }

    #[test]
    fn displays_with_explicit_sign() {
        assert_eq!(UtcOffsetHours::new(9).unwrap().to_string(), "UTC+9");
        assert_eq!(UtcOffsetHours::new(-5).unwrap().to_string(), "UTC-5");
        assert_eq!(UtcOffsetHours::ZERO.to_string(), "UTC+0");
    }
}
