//! Platform-agnostic playback channel traits
//!
//! Abstracts the concrete audio backend (HTML-audio-style element, native
//! output, test double) behind a small control surface. The correction loop
//! only ever talks to units through these traits.

use crate::types::{ChannelSettings, SegmentPointer};
use std::time::Duration;

/// One controllable backend playback channel
///
/// All operations are synchronous, non-blocking, best-effort calls that
/// return immediately with best-available information. Backends are allowed
/// to be imprecise: position reads may be stale and seeks issued right after
/// playback starts may be silently ignored. The correction loop compensates
/// by re-checking every tick.
pub trait AudioChannel: Send {
    /// Begin playback of the identified segment
    ///
    /// With `force_restart`, the segment replaces whatever is already in
    /// progress on this channel.
    fn play(&mut self, pointer: &SegmentPointer, force_restart: bool);

    /// Halt playback
    fn stop(&mut self);

    /// Force the playhead to `position`
    ///
    /// Returns whether the backend honored the seek; callers retry on later
    /// ticks when it did not.
    fn set_position(&mut self, position: Duration) -> bool;

    /// Best-available current playhead position
    fn position(&self) -> Duration;

    /// Set channel volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current channel volume
    fn volume(&self) -> f32;

    /// Resume displaced background playback
    ///
    /// Invoked only on single-channel hosts, where a queued foreground sound
    /// plays on the same channel as the background loop and the background
    /// has to be restarted manually afterwards. The default is a no-op.
    fn restart_background(&mut self) {}
}

/// Constructor for additional backend channels
///
/// The clone pool goes through this to bind one more channel to an already
/// registered resource. Returning `None` means the host cannot sustain
/// another channel; the requesting queue entry is then dropped.
pub trait ChannelFactory: Send {
    /// Open a new backend channel for `settings`
    fn open_channel(&mut self, settings: &ChannelSettings) -> Option<Box<dyn AudioChannel>>;
}

/// Dummy channel for unit tests
///
/// Honors every command and keeps the resulting state inspectable.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct DummyChannel {
    pub position: Duration,
    pub volume: f32,
    pub honor_seeks: bool,
}

#[cfg(test)]
impl Default for DummyChannel {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            volume: 1.0,
            honor_seeks: true,
        }
    }
}

#[cfg(test)]
impl DummyChannel {
    pub fn boxed() -> Box<dyn AudioChannel> {
        Box::new(Self::default())
    }
}

#[cfg(test)]
impl AudioChannel for DummyChannel {
    fn play(&mut self, _pointer: &SegmentPointer, _force_restart: bool) {}

    fn stop(&mut self) {}

    fn set_position(&mut self, position: Duration) -> bool {
        if self.honor_seeks {
            self.position = position;
            true
        } else {
            false
        }
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}
