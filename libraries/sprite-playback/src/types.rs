//! Core types for sprite playback management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A bounded sub-region of a playback unit's resource
///
/// A segment is the playback intent the correction loop enforces: play from
/// `start`, stop (or wrap) at `end`. Assigned once per play invocation and
/// cleared when the unit stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Offset of the first sample to play
    pub start: Duration,

    /// Offset at which playback must stop, or wrap when looped
    pub end: Duration,

    /// Restart from `start` instead of stopping at `end`
    pub looped: bool,
}

impl Segment {
    /// Create a one-shot segment
    pub fn new(start: Duration, end: Duration) -> Self {
        Self {
            start,
            end,
            looped: false,
        }
    }

    /// Create a looping segment
    pub fn looping(start: Duration, end: Duration) -> Self {
        Self {
            start,
            end,
            looped: true,
        }
    }

    /// Check whether an offset falls inside this segment
    ///
    /// `start` is inclusive, `end` exclusive.
    pub fn contains(&self, offset: Duration) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Names the sub-region a play request refers to
///
/// Either a named sprite from the unit's sprite map or a raw offset into the
/// resource. Pointer validity is a property of the type: resolution against a
/// concrete configuration happens in [`ChannelSettings::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentPointer {
    /// A named sprite from the unit's sprite map
    Named(String),

    /// A raw offset into the resource
    At(Duration),
}

impl SegmentPointer {
    /// Convenience constructor for a named sprite pointer
    pub fn named(name: impl Into<String>) -> Self {
        SegmentPointer::Named(name.into())
    }
}

/// Per-segment playback state, derived from a unit's intent fields
///
/// Lifetime of one segment: `Idle → SeekPending → Ready`, then back to
/// `SeekPending` on a loop wrap or `Idle` on stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentState {
    /// No segment assigned
    Idle,

    /// Segment assigned, start position not yet confirmed by the backend
    SeekPending,

    /// Start position confirmed; boundary enforcement is active
    Ready,
}

/// Configuration for one playback channel
///
/// A closed set of recognized fields. Copying a configuration is a plain
/// value clone; the clone pool copies an origin's settings and forces
/// `autoplay` off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Resource the channel is bound to
    pub resource: String,

    /// Start playback as soon as the channel is ready
    pub autoplay: bool,

    /// Initial channel volume (0.0 - 1.0)
    pub volume: f32,

    /// Total resource length
    pub duration: Duration,

    /// Named sub-clips of the resource
    pub sprites: BTreeMap<String, Segment>,
}

impl ChannelSettings {
    /// Create settings for a resource of known length
    pub fn new(resource: impl Into<String>, duration: Duration) -> Self {
        Self {
            resource: resource.into(),
            autoplay: false,
            volume: 1.0,
            duration,
            sprites: BTreeMap::new(),
        }
    }

    /// Register a named sprite (builder-style)
    pub fn with_sprite(mut self, name: impl Into<String>, segment: Segment) -> Self {
        self.sprites.insert(name.into(), segment);
        self
    }

    /// Set the initial volume, clamped to 0.0 - 1.0 (builder-style)
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Resolve a pointer against this configuration
    ///
    /// Named pointers look up the sprite map. Offset pointers resolve to the
    /// sprite containing the offset, falling back to a one-shot segment from
    /// the offset to the end of the resource. Returns `None` for an unknown
    /// sprite name or an offset past the resource end.
    pub fn resolve(&self, pointer: &SegmentPointer) -> Option<Segment> {
        match pointer {
            SegmentPointer::Named(name) => self.sprites.get(name).copied(),
            SegmentPointer::At(offset) => {
                if *offset > self.duration {
                    return None;
                }
                let containing = self.sprites.values().find(|sprite| sprite.contains(*offset));
                Some(
                    containing
                        .copied()
                        .unwrap_or_else(|| Segment::new(*offset, self.duration)),
                )
            }
        }
    }
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self::new(String::new(), Duration::ZERO)
    }
}
