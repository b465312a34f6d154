//! Playback events
//!
//! Event-based communication for embedder synchronization. The manager
//! buffers events at scheduler decision points and the embedder drains them
//! with [`crate::PlaybackManager::take_pending_events`]; nothing inside the
//! crate consumes them.

use crate::types::Segment;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A segment began playing on a unit
    SegmentStarted {
        /// Unit the segment started on
        unit_id: String,
        /// The assigned segment
        segment: Segment,
    },

    /// A looped segment wrapped back to its start
    SegmentLooped {
        /// Unit that wrapped
        unit_id: String,
    },

    /// A segment reached its end and the unit stopped
    SegmentFinished {
        /// Unit that stopped
        unit_id: String,
    },

    /// A clone was registered to satisfy a queued request
    CloneSpawned {
        /// Id of the clone unit
        unit_id: String,
        /// Origin the request named
        origin_id: String,
    },

    /// An idle clone was reclaimed from the registry
    CloneReclaimed {
        /// Id of the reclaimed clone
        unit_id: String,
    },

    /// A queued request was consumed without starting playback
    QueueEntryDropped {
        /// Origin the dropped entry named
        origin_id: String,
    },

    /// A unit's volume changed
    VolumeChanged {
        /// Unit whose volume changed
        unit_id: String,
        /// New volume (0.0 - 1.0)
        volume: f32,
    },
}
