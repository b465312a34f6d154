//! Playback manager - channel virtualization core
//!
//! Owns the channel registry, the clone pool and the pending queue, and runs
//! the fixed-cadence correction loop that reconciles backend-reported state
//! against each unit's requested segment.

use crate::{
    backend::ChannelFactory,
    capability::CapabilitySnapshot,
    clones::ClonePool,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::PendingQueue,
    registry::ChannelRegistry,
    types::{Segment, SegmentPointer, SegmentState},
    unit::PlaybackUnit,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Correction-loop cadence the scheduler was designed around
///
/// The loop tolerates drift at this scale; the embedder owns the actual
/// timer and may tick faster or slower.
pub const RECOMMENDED_TICK_INTERVAL: Duration = Duration::from_millis(20);

/// Channel-virtualizing playback scheduler
///
/// Multiplexes a hard-capped number of backend channels across an arbitrary
/// number of sound requests. Single-threaded and tick-driven: the embedder
/// invokes [`run_tick`](Self::run_tick) at a fixed cadence and the manager
/// never runs concurrently with itself.
///
/// Per unit and segment, the manager walks `Idle → SeekPending → Ready`,
/// then either wraps looped segments back to `SeekPending` or stops at the
/// segment end and returns to `Idle`. Backends are assumed unreliable: the
/// start position is re-forced every tick until a seek is observed to stick,
/// and boundary enforcement works off polled positions.
pub struct PlaybackManager {
    registry: ChannelRegistry,
    clones: ClonePool,
    queue: PendingQueue,
    capabilities: CapabilitySnapshot,
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackManager {
    /// Create a manager from a capability snapshot and a clone factory
    pub fn new(capabilities: CapabilitySnapshot, factory: Box<dyn ChannelFactory>) -> Self {
        Self {
            registry: ChannelRegistry::new(),
            clones: ClonePool::new(factory),
            queue: PendingQueue::new(),
            capabilities,
            pending_events: Vec::new(),
        }
    }

    // ===== Registry =====

    /// Register a unit with the correction loop
    ///
    /// Fails on a duplicate id; the rejected unit is dropped.
    pub fn add(&mut self, unit: PlaybackUnit) -> bool {
        match self.registry.add(unit) {
            Ok(()) => true,
            Err(rejected) => {
                warn!("Rejected duplicate unit registration: {}", rejected.id());
                false
            }
        }
    }

    /// Remove a unit from the correction loop
    pub fn remove(&mut self, id: &str) -> bool {
        self.registry.remove(id).is_some()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Number of currently registered units
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    /// Read-only view of a registered unit
    pub fn unit(&self, id: &str) -> Option<&PlaybackUnit> {
        self.registry.get(id)
    }

    /// Capability snapshot the scheduler was built with
    pub fn capabilities(&self) -> &CapabilitySnapshot {
        &self.capabilities
    }

    // ===== Play control =====

    /// Begin segment playback on a registered unit
    ///
    /// Resolves the pointer against the unit's settings, replaces any active
    /// segment and enters the seek-pending state; the correction loop forces
    /// the start position on subsequent ticks until the backend honors it.
    /// An invalid pointer leaves the unit untouched.
    pub fn play(&mut self, id: &str, pointer: &SegmentPointer, force_restart: bool) -> Result<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlaybackError::UnitNotRegistered(id.to_string()))?;

        let Some(segment) = unit.settings().resolve(pointer) else {
            return Err(match pointer {
                SegmentPointer::Named(name) => PlaybackError::UnknownSprite {
                    unit: id.to_string(),
                    sprite: name.clone(),
                },
                SegmentPointer::At(offset) => PlaybackError::OffsetOutOfBounds(*offset),
            });
        };

        unit.begin_segment(segment, pointer, force_restart);
        debug!("Segment {:?}-{:?} started on {}", segment.start, segment.end, id);
        self.pending_events.push(PlaybackEvent::SegmentStarted {
            unit_id: id.to_string(),
            segment,
        });
        Ok(())
    }

    /// Submit a play intent for a unit
    ///
    /// Plays immediately when the unit is idle; otherwise defers the request
    /// to the pending queue so a later tick can satisfy it with a clone.
    /// Returns acceptance.
    pub fn request(&mut self, id: &str, pointer: &SegmentPointer) -> bool {
        let idle = match self.registry.get(id) {
            None => return false,
            Some(unit) => unit.segment().is_none(),
        };

        if idle {
            self.play(id, pointer, false).is_ok()
        } else {
            self.enqueue(pointer.clone(), id)
        }
    }

    /// Stop a unit and clear its segment intent
    pub fn stop(&mut self, id: &str) -> Result<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlaybackError::UnitNotRegistered(id.to_string()))?;
        unit.halt();
        Ok(())
    }

    /// Mark a background segment on a unit
    ///
    /// Single-channel hosts use this to resume a background loop after a
    /// queued foreground sound displaced it.
    pub fn set_background(&mut self, id: &str, segment: Segment) -> Result<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlaybackError::UnitNotRegistered(id.to_string()))?;
        unit.set_background(Some(segment));
        Ok(())
    }

    /// Clear a unit's background segment
    pub fn clear_background(&mut self, id: &str) -> Result<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| PlaybackError::UnitNotRegistered(id.to_string()))?;
        unit.set_background(None);
        Ok(())
    }

    // ===== Pending queue =====

    /// Submit a deferred play request
    ///
    /// Accepted only when `origin_id` names a currently registered unit.
    /// Queued requests are best-effort: each is consumed in exactly one
    /// drain attempt and never retried.
    pub fn enqueue(&mut self, pointer: SegmentPointer, origin_id: &str) -> bool {
        if !self.registry.contains(origin_id) {
            debug!("Rejected queue entry for unregistered origin {}", origin_id);
            return false;
        }
        self.queue.push(pointer, origin_id);
        true
    }

    /// Number of queued play requests
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    // ===== Volume =====

    /// Set a unit's channel volume (0.0 - 1.0)
    pub fn set_volume(&mut self, id: &str, volume: f32) -> bool {
        let Some(unit) = self.registry.get_mut(id) else {
            return false;
        };
        unit.set_volume(volume);
        let volume = unit.volume();
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            unit_id: id.to_string(),
            volume,
        });
        true
    }

    /// A unit's current channel volume
    pub fn volume(&self, id: &str) -> Option<f32> {
        self.registry.get(id).map(PlaybackUnit::volume)
    }

    // ===== Observability =====

    /// Per-segment state of a registered unit
    pub fn segment_state(&self, id: &str) -> Option<SegmentState> {
        self.registry.get(id).map(PlaybackUnit::segment_state)
    }

    /// First candidate resource whose extension the platform can play
    ///
    /// Pure lookup against the capability snapshot's codec table.
    pub fn resolve_playable_resource<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        self.capabilities.codecs.resolve_playable(candidates)
    }

    /// Drain buffered playback events
    pub fn take_pending_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Correction loop =====

    /// Run one correction-loop pass
    ///
    /// Invoked at a fixed cadence by an external timer or game loop; see
    /// [`RECOMMENDED_TICK_INTERVAL`]. A tick that drains a queue entry into
    /// a clone does queue work only; reconciliation resumes on the next
    /// tick. All per-unit work is best-effort and local: a unit the backend
    /// refuses to position or stop stays in its observed state and is
    /// retried next tick, without blocking the others.
    pub fn run_tick(&mut self) {
        if self.registry.is_empty() {
            return;
        }

        if !self.queue.is_empty() && self.registry.len() < self.capabilities.channels {
            self.drain_into_clone();
            return;
        }
        if !self.queue.is_empty() && self.capabilities.channels == 1 {
            self.drain_onto_origin();
        }

        self.reconcile();
    }

    /// Queue drain, multiplexed path: satisfy the head entry with a clone
    ///
    /// The entry is consumed whether or not playback starts.
    fn drain_into_clone(&mut self) {
        let Some(entry) = self.queue.pop() else {
            return;
        };

        let Some(origin_unit) = self.registry.get(&entry.origin) else {
            debug!("Dropped queue entry: origin {} no longer registered", entry.origin);
            self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                origin_id: entry.origin,
            });
            return;
        };

        // Clones never chain: a clone of a clone shares the first origin
        let root_origin = origin_unit.origin().to_string();
        let settings = origin_unit.settings().clone();
        let origin_volume = origin_unit.volume();

        let Some(mut clone) = self.clones.acquire(&root_origin, &settings) else {
            debug!("Dropped queue entry for {}: no clone channel available", entry.origin);
            self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                origin_id: entry.origin,
            });
            return;
        };

        if self.capabilities.volume_supported {
            clone.set_volume(origin_volume);
        }

        let clone_id = clone.id().to_string();
        if self.registry.add(clone).is_err() {
            // Pool ids carry their own sequence; a collision means the
            // caller registered such an id manually
            warn!("Clone id collision, dropping queue entry: {}", clone_id);
            self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                origin_id: entry.origin,
            });
            return;
        }

        self.pending_events.push(PlaybackEvent::CloneSpawned {
            unit_id: clone_id.clone(),
            origin_id: entry.origin.clone(),
        });

        if let Err(error) = self.play(&clone_id, &entry.pointer, true) {
            debug!("Dropped queue entry for {}: {}", entry.origin, error);
            self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                origin_id: entry.origin,
            });
        }
    }

    /// Queue drain, single-channel path: replay the origin directly
    ///
    /// Sacrifices overlap for hosts that cannot open independent channels;
    /// the origin's current segment is overridden.
    fn drain_onto_origin(&mut self) {
        let Some(entry) = self.queue.pop() else {
            return;
        };

        if self.registry.contains(&entry.origin) {
            if let Err(error) = self.play(&entry.origin, &entry.pointer, true) {
                debug!("Dropped queue entry for {}: {}", entry.origin, error);
                self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                    origin_id: entry.origin,
                });
            }
        } else {
            debug!("Dropped queue entry: origin {} no longer registered", entry.origin);
            self.pending_events.push(PlaybackEvent::QueueEntryDropped {
                origin_id: entry.origin,
            });
        }
    }

    /// Reconcile every unit's observed state against its segment intent
    fn reconcile(&mut self) {
        for id in self.registry.ids() {
            let Some(unit) = self.registry.get_mut(&id) else {
                continue;
            };
            let position = unit.position();

            if let Some(segment) = unit.segment() {
                if unit.segment_state() == SegmentState::SeekPending {
                    // Early seeks may be silently ignored; retry until the
                    // backend is observed to honor one
                    unit.correct_position();
                } else if position > segment.end {
                    if segment.looped {
                        unit.restart_segment();
                        debug!("Segment looped on {}", id);
                        self.pending_events
                            .push(PlaybackEvent::SegmentLooped { unit_id: id });
                    } else {
                        unit.halt();
                        debug!("Segment finished on {}", id);
                        self.pending_events
                            .push(PlaybackEvent::SegmentFinished { unit_id: id });
                    }
                }
            } else if unit.is_clone() {
                if let Some(clone) = self.registry.remove(&id) {
                    self.clones.release(clone);
                    debug!("Reclaimed idle clone {}", id);
                    self.pending_events
                        .push(PlaybackEvent::CloneReclaimed { unit_id: id });
                }
            } else if let Some(background) = unit.background() {
                if position > background.end {
                    unit.restart_background();
                }
            }
        }
    }
}
