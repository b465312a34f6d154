//! Clone pool
//!
//! Clones let one sound source play several overlapping, independently
//! positioned sub-clips by binding additional backend channels to the same
//! resource rather than duplicating the resource bytes.

use crate::backend::ChannelFactory;
use crate::types::ChannelSettings;
use crate::unit::PlaybackUnit;
use tracing::debug;

/// Pool of idle clone units
///
/// A clone in the pool is free by definition: busy clones live in the channel
/// registry and return here when the correction loop reclaims them. Pool
/// order is insertion order, so reuse is deterministic first-match.
pub struct ClonePool {
    free: Vec<PlaybackUnit>,
    factory: Box<dyn ChannelFactory>,
    next_seq: u64,
}

impl ClonePool {
    pub fn new(factory: Box<dyn ChannelFactory>) -> Self {
        Self {
            free: Vec::new(),
            factory,
            next_seq: 0,
        }
    }

    /// Take a free clone for `origin`, creating one if the backend allows
    ///
    /// Reuse picks the first free clone with a matching origin in pool order,
    /// without touching the backend. Otherwise a new channel is opened from a
    /// copy of the origin's settings with autoplay forced off; clones are
    /// driven exclusively by the correction loop. Returns `None` when no free
    /// clone exists and the factory declines a new channel.
    pub fn acquire(&mut self, origin: &str, settings: &ChannelSettings) -> Option<PlaybackUnit> {
        if let Some(index) = self.free.iter().position(|unit| unit.origin() == origin) {
            return Some(self.free.remove(index));
        }

        // Clones just don't autoplay
        let mut clone_settings = settings.clone();
        clone_settings.autoplay = false;

        let channel = self.factory.open_channel(&clone_settings)?;
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = format!("{origin}#clone{seq}");
        debug!("Spawned clone {} for origin {}", id, origin);
        Some(PlaybackUnit::new_clone(
            id,
            origin.to_string(),
            clone_settings,
            channel,
        ))
    }

    /// Non-mutating view of the clone `acquire` would reuse
    pub fn find_free(&self, origin: &str) -> Option<&PlaybackUnit> {
        self.free.iter().find(|unit| unit.origin() == origin)
    }

    /// Return a reclaimed clone to the pool
    pub fn release(&mut self, unit: PlaybackUnit) {
        debug_assert!(unit.is_clone());
        debug_assert!(unit.segment().is_none());
        debug!("Clone {} returned to pool", unit.id());
        self.free.push(unit);
    }

    /// Number of free clones currently pooled
    pub fn free_len(&self) -> usize {
        self.free.len()
    }
}
