//! Sprite Player - Playback Management
//!
//! Channel-virtualized sound sprite playback for Sprite Player.
//!
//! This crate provides:
//! - Channel registry with a hard concurrency ceiling
//! - Clone pool for overlapping sub-clip playback of one resource
//! - FIFO pending queue for deferred play requests
//! - Fixed-cadence correction loop (seek correction, boundary enforcement,
//!   loop restart, idle-clone reclamation)
//! - Degraded single-channel path for hosts without independent channels
//! - Capability detection (codec table, channel ceiling, volume support)
//!
//! # Architecture
//!
//! `sprite-playback` is completely platform-agnostic:
//! - No dependency on any concrete audio backend
//! - No timer of its own; the embedder invokes [`PlaybackManager::run_tick`]
//!   at a fixed cadence (see [`RECOMMENDED_TICK_INTERVAL`])
//! - Single-threaded: one logical writer, no locking
//!
//! Platform-specific code (actual playback, channel construction) is
//! provided via the [`AudioChannel`] and [`ChannelFactory`] traits. Backends
//! are assumed coarse and unreliable: position reads may be stale and early
//! seeks may be silently ignored. The correction loop absorbs both by
//! re-checking every registered unit on every tick.
//!
//! # Example: Playing a sound sprite
//!
//! ```rust
//! use sprite_playback::{
//!     detect_capabilities, AudioChannel, ChannelFactory, ChannelSettings, Environment,
//!     PlaybackManager, PlaybackUnit, Segment, SegmentPointer,
//! };
//! use std::time::Duration;
//!
//! // Implement the backend traits for your platform
//! struct SilentChannel {
//!     position: Duration,
//!     volume: f32,
//! }
//!
//! impl AudioChannel for SilentChannel {
//!     fn play(&mut self, _pointer: &SegmentPointer, _force_restart: bool) {}
//!     fn stop(&mut self) {}
//!     fn set_position(&mut self, position: Duration) -> bool {
//!         self.position = position;
//!         true
//!     }
//!     fn position(&self) -> Duration {
//!         self.position
//!     }
//!     fn set_volume(&mut self, volume: f32) {
//!         self.volume = volume;
//!     }
//!     fn volume(&self) -> f32 {
//!         self.volume
//!     }
//! }
//!
//! struct SilentFactory;
//!
//! impl ChannelFactory for SilentFactory {
//!     fn open_channel(&mut self, _settings: &ChannelSettings) -> Option<Box<dyn AudioChannel>> {
//!         Some(Box::new(SilentChannel {
//!             position: Duration::ZERO,
//!             volume: 1.0,
//!         }))
//!     }
//! }
//!
//! // Detect what the host can do, once, before the first tick
//! let capabilities = detect_capabilities(&Environment {
//!     playable_mime_types: vec!["audio/ogg".to_string()],
//!     channel_limit: Some(8),
//!     volume_control: true,
//! });
//!
//! let mut manager = PlaybackManager::new(capabilities, Box::new(SilentFactory));
//!
//! // Register a unit with a named sub-clip
//! let settings = ChannelSettings::new("sounds/ui.ogg", Duration::from_secs(10)).with_sprite(
//!     "click",
//!     Segment::new(Duration::from_millis(2300), Duration::from_millis(4100)),
//! );
//! let unit = PlaybackUnit::new(
//!     "ui",
//!     settings,
//!     Box::new(SilentChannel {
//!         position: Duration::ZERO,
//!         volume: 1.0,
//!     }),
//! );
//! assert!(manager.add(unit));
//!
//! // Submit intents: idle units play immediately, busy units defer to the
//! // queue and a later tick satisfies them with a clone
//! assert!(manager.request("ui", &SegmentPointer::named("click")));
//! assert!(manager.request("ui", &SegmentPointer::named("click")));
//!
//! // The embedder owns the cadence
//! manager.run_tick();
//! ```

mod clones;
mod error;
mod manager;
mod queue;
mod registry;

pub mod backend;
pub mod capability;
pub mod events;
pub mod types;
pub mod unit;

// Public exports
pub use backend::{AudioChannel, ChannelFactory};
pub use capability::{detect_capabilities, CapabilitySnapshot, CodecTable, Environment};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use manager::{PlaybackManager, RECOMMENDED_TICK_INTERVAL};
pub use types::{ChannelSettings, Segment, SegmentPointer, SegmentState};
pub use unit::PlaybackUnit;
