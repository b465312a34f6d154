//! Playback unit state
//!
//! A unit couples one backend channel with its configuration and the segment
//! intent the correction loop enforces against backend-reported state.

use crate::backend::AudioChannel;
use crate::types::{ChannelSettings, Segment, SegmentPointer, SegmentState};
use std::time::Duration;

/// One managed playback channel
///
/// Origin units are created by callers and live until explicitly removed.
/// Clone units are created by the clone pool to let one resource play several
/// overlapping segments; they are reclaimed automatically once idle.
pub struct PlaybackUnit {
    /// Unique unit identifier
    id: String,

    /// Id of the unit this one was cloned from; an origin unit's own id
    origin: String,

    /// Channel configuration
    settings: ChannelSettings,

    /// Backend control surface
    channel: Box<dyn AudioChannel>,

    /// Active playback intent
    segment: Option<Segment>,

    /// Whether the playhead has been confirmed at `segment.start`
    ///
    /// Meaningful only while a segment is set; reset on every new assignment.
    ready_for_segment: bool,

    /// Clones are reclaimed by the correction loop once idle
    is_clone: bool,

    /// Background continuation segment (single-channel hosts)
    background: Option<Segment>,
}

impl PlaybackUnit {
    /// Create an origin unit owned by the caller
    pub fn new(
        id: impl Into<String>,
        settings: ChannelSettings,
        channel: Box<dyn AudioChannel>,
    ) -> Self {
        let id = id.into();
        Self {
            origin: id.clone(),
            id,
            settings,
            channel,
            segment: None,
            ready_for_segment: false,
            is_clone: false,
            background: None,
        }
    }

    /// Create a clone unit derived from `origin`
    pub(crate) fn new_clone(
        id: String,
        origin: String,
        settings: ChannelSettings,
        channel: Box<dyn AudioChannel>,
    ) -> Self {
        Self {
            id,
            origin,
            settings,
            channel,
            segment: None,
            ready_for_segment: false,
            is_clone: true,
            background: None,
        }
    }

    /// Unit identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the unit this one was derived from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether this unit is an ephemeral clone
    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    /// Channel configuration
    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }

    /// Active playback intent, if any
    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    /// Background continuation segment, if any
    pub fn background(&self) -> Option<Segment> {
        self.background
    }

    /// Current per-segment state
    pub fn segment_state(&self) -> SegmentState {
        match (self.segment, self.ready_for_segment) {
            (None, _) => SegmentState::Idle,
            (Some(_), false) => SegmentState::SeekPending,
            (Some(_), true) => SegmentState::Ready,
        }
    }

    /// Best-available playhead position
    pub fn position(&self) -> Duration {
        self.channel.position()
    }

    /// Current channel volume
    pub fn volume(&self) -> f32 {
        self.channel.volume()
    }

    /// Assign a new segment intent and start backend playback
    pub(crate) fn begin_segment(
        &mut self,
        segment: Segment,
        pointer: &SegmentPointer,
        force_restart: bool,
    ) {
        self.segment = Some(segment);
        self.ready_for_segment = false;
        self.channel.play(pointer, force_restart);
    }

    /// Restart the active segment from its start (loop wrap)
    ///
    /// Re-enters the seek-pending state so the start position is re-verified.
    pub(crate) fn restart_segment(&mut self) {
        if let Some(segment) = self.segment {
            self.ready_for_segment = false;
            self.channel.play(&SegmentPointer::At(segment.start), true);
        }
    }

    /// Attempt the deferred start-position correction
    ///
    /// Backends may ignore seeks issued right after playback starts; the
    /// outcome is recorded and the correction retried on later ticks.
    pub(crate) fn correct_position(&mut self) {
        if let Some(segment) = self.segment {
            self.ready_for_segment = self.channel.set_position(segment.start);
        }
    }

    /// Stop playback and clear the segment intent
    pub(crate) fn halt(&mut self) {
        self.channel.stop();
        self.segment = None;
        self.ready_for_segment = false;
    }

    pub(crate) fn set_background(&mut self, segment: Option<Segment>) {
        self.background = segment;
    }

    pub(crate) fn restart_background(&mut self) {
        self.channel.restart_background();
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.channel.set_volume(volume.clamp(0.0, 1.0));
    }
}
