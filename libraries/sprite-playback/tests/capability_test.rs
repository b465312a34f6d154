//! Capability detection integration tests
//!
//! Covers the detect-once-then-resolve pipeline: an environment description
//! becomes a capability snapshot, and resource candidates resolve against
//! its codec table through the manager.

use sprite_playback::{
    detect_capabilities, AudioChannel, CapabilitySnapshot, ChannelFactory, ChannelSettings,
    CodecTable, Environment, PlaybackManager, SegmentPointer,
};
use std::time::Duration;

// ===== Test Helpers =====

struct NullChannel;

impl AudioChannel for NullChannel {
    fn play(&mut self, _pointer: &SegmentPointer, _force_restart: bool) {}
    fn stop(&mut self) {}
    fn set_position(&mut self, _position: Duration) -> bool {
        true
    }
    fn position(&self) -> Duration {
        Duration::ZERO
    }
    fn set_volume(&mut self, _volume: f32) {}
    fn volume(&self) -> f32 {
        1.0
    }
}

struct NullFactory;

impl ChannelFactory for NullFactory {
    fn open_channel(&mut self, _settings: &ChannelSettings) -> Option<Box<dyn AudioChannel>> {
        Some(Box::new(NullChannel))
    }
}

fn manager_with(codecs: CodecTable) -> PlaybackManager {
    PlaybackManager::new(
        CapabilitySnapshot {
            channels: 8,
            volume_supported: true,
            codecs,
        },
        Box::new(NullFactory),
    )
}

// ===== Resource Resolution =====

#[test]
fn resolves_first_candidate_with_truthy_codec_entry() {
    let mut codecs = CodecTable::new();
    codecs.insert("ogg", None);
    codecs.insert("mp3", Some("audio/mp3".to_string()));
    let manager = manager_with(codecs);

    assert_eq!(
        manager.resolve_playable_resource(&["a.ogg", "a.mp3"]),
        Some("a.mp3")
    );
}

#[test]
fn resolves_none_without_any_match() {
    let manager = manager_with(CodecTable::new());
    assert_eq!(manager.resolve_playable_resource(&["a.ogg", "a.mp3"]), None);
    assert_eq!(manager.resolve_playable_resource(&[]), None);
}

// ===== Detection Pipeline =====

#[test]
fn detected_snapshot_drives_resolution() {
    let capabilities = detect_capabilities(&Environment {
        playable_mime_types: vec!["audio/mpeg".to_string()],
        channel_limit: None,
        volume_control: true,
    });
    assert_eq!(capabilities.channels, 8);
    assert!(capabilities.playable());

    let manager = PlaybackManager::new(capabilities, Box::new(NullFactory));
    assert_eq!(
        manager.resolve_playable_resource(&["music/theme.ogg", "music/theme.mp3"]),
        Some("music/theme.mp3")
    );
}

#[test]
fn undetectable_environment_resolves_nothing() {
    let capabilities = detect_capabilities(&Environment::default());
    assert!(!capabilities.playable());

    let manager = PlaybackManager::new(capabilities, Box::new(NullFactory));
    assert_eq!(
        manager.resolve_playable_resource(&["a.ogg", "a.mp3", "a.wav"]),
        None
    );
}
