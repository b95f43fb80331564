//! The pending "add clock" input.

use crate::common::{ClockId, UtcOffsetHours};
use crate::engine::WorldClockEngine;
use crate::registry::RegistryError;

/// Holds what the user has typed so far.
///
/// Offset input that doesn't parse as an integer in `[-12, 12]` silently
/// becomes zero; there is no error state to display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockForm {
    name: String,
    offset: UtcOffsetHours,
}

impl ClockForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> UtcOffsetHours {
        self.offset
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_offset_input(&mut self, input: &str) {
        self.offset = input
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(UtcOffsetHours::new)
            .unwrap_or(UtcOffsetHours::ZERO);
    }

    /// Adds the pending clock. Clears the form only on success.
    pub async fn submit(&mut self, engine: &WorldClockEngine) -> Result<ClockId, RegistryError> {
        let id = engine.add_clock(self.name.clone(), self.offset.hours()).await?;
        self.clear();
        Ok(id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
