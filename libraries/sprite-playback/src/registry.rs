//! Channel registry
//!
//! Tracks the set of playback units currently under correction-loop
//! management. Holds no playback logic.

use crate::unit::PlaybackUnit;
use std::collections::BTreeMap;

/// Registry of live playback units
///
/// Keyed by unit id with deterministic (sorted) iteration order so
/// reconciliation behaves identically across runs. The live count is the
/// map's own size, maintained incrementally by the map, which keeps capacity
/// checks O(1).
#[derive(Default)]
pub struct ChannelRegistry {
    units: BTreeMap<String, PlaybackUnit>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit
    ///
    /// Rejects a duplicate id, handing the unit back untouched.
    pub fn add(&mut self, unit: PlaybackUnit) -> Result<(), PlaybackUnit> {
        if self.units.contains_key(unit.id()) {
            return Err(unit);
        }
        self.units.insert(unit.id().to_string(), unit);
        Ok(())
    }

    /// Remove a unit, returning it when it was registered
    pub fn remove(&mut self, id: &str) -> Option<PlaybackUnit> {
        self.units.remove(id)
    }

    /// Look up a unit without mutating anything
    pub fn get(&self, id: &str) -> Option<&PlaybackUnit> {
        self.units.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlaybackUnit> {
        self.units.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    /// Live unit count
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Snapshot of registered ids, in iteration order
    ///
    /// Reconciliation works off a snapshot so units can be removed mid-pass.
    pub fn ids(&self) -> Vec<String> {
        self.units.keys().cloned().collect()
    }
}
