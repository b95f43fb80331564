//! The ordered, in-memory collection of configured clocks.

use crate::common::{ClockId, UtcOffsetHours};
use slotmap::SlotMap;
use thiserror::Error;

/// A named clock at a fixed offset. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    pub name: String,
    pub offset: UtcOffsetHours,
}

/// Reasons an add request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("clock name must not be empty")]
    EmptyName,
    #[error("offset {0} is outside the accepted range [-12, 12]")]
    OffsetOutOfRange(i64),
}

/// Clocks in display order.
///
/// Entries live in a `SlotMap` keyed by `ClockId`; `order` holds the keys in
/// insertion order, which is the display order.
#[derive(Debug, Default)]
pub struct ClockRegistry {
    clocks: SlotMap<ClockId, ClockConfig>,
    order: Vec<ClockId>,
}

impl ClockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clock at the end of the list.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        offset_hours: i64,
    ) -> Result<ClockId, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let offset = UtcOffsetHours::new(offset_hours)
            .ok_or(RegistryError::OffsetOutOfRange(offset_hours))?;

        let id = self.clocks.insert(ClockConfig { name, offset });
        self.order.push(id);
        Ok(id)
    }

    /// Removes the clock at `position`. Out of bounds is a no-op.
    pub fn remove(&mut self, position: usize) -> Option<(ClockId, ClockConfig)> {
        if position >= self.order.len() {
            return None;
        }
        let id = self.order.remove(position);
        self.clocks.remove(id).map(|config| (id, config))
    }

    pub fn remove_by_id(&mut self, id: ClockId) -> Option<ClockConfig> {
        let config = self.clocks.remove(id)?;
        self.order.retain(|&other| other != id);
        Some(config)
    }

    /// An ordered snapshot for rendering.
    pub fn list(&self) -> Vec<(ClockId, ClockConfig)> {
        self.order
            .iter()
            .filter_map(|&id| self.clocks.get(id).map(|config| (id, config.clone())))
            .collect()
    }

    pub fn get(&self, id: ClockId) -> Option<&ClockConfig> {
        self.clocks.get(id)
    }

    pub fn id_at(&self, position: usize) -> Option<ClockId> {
        self.order.get(position).copied()
    }

    pub fn position_of(&self, id: ClockId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
