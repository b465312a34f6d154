//! Platform capability detection and codec support
//!
//! The correction loop is capability-agnostic apart from reading the channel
//! ceiling and the volume flag; everything platform-specific funnels through
//! the snapshot produced here, once, before the loop's first tick.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Channel ceiling assumed when the host does not report one
const DEFAULT_CHANNELS: usize = 8;

/// Extension to candidate MIME types probed during detection
///
/// Per extension, the first candidate the environment can play wins.
const MIME_CANDIDATES: &[(&str, &[&str])] = &[
    ("3gp", &["audio/3gpp", "audio/amr"]),
    ("aac", &["audio/aac", "audio/aacp"]),
    ("amr", &["audio/amr", "audio/3gpp"]),
    ("m4a", &["audio/mp4", "audio/mpeg4", "audio/x-m4a"]),
    ("mp3", &["audio/mp3", "audio/mpeg", "audio/MPA", "audio/mpa-robust"]),
    ("mpga", &["audio/MPA", "audio/mpa-robust", "audio/mpeg"]),
    ("mp4", &["audio/mp4", "video/mp4"]),
    ("ogg", &["application/ogg", "audio/ogg", "video/ogg"]),
    ("wav", &["audio/wave", "audio/wav", "audio/x-wav", "audio/x-pn-wav"]),
    ("webm", &["audio/webm", "video/webm"]),
];

/// Extensions that make a snapshot playable at all
const CORE_EXTENSIONS: &[&str] = &["mp3", "ogg", "webm", "wav"];

/// Extension to supported-MIME lookup
///
/// `Some(mime)` marks a playable extension; `None` records an extension that
/// was probed and found unsupported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodecTable {
    entries: BTreeMap<String, Option<String>>,
}

impl CodecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record support for an extension
    pub fn insert(&mut self, extension: impl Into<String>, mime: Option<String>) {
        self.entries.insert(extension.into(), mime);
    }

    /// Whether resources with this extension are playable
    pub fn supports(&self, extension: &str) -> bool {
        matches!(self.entries.get(extension), Some(Some(_)))
    }

    /// MIME type a playable extension resolved to
    pub fn mime(&self, extension: &str) -> Option<&str> {
        self.entries.get(extension)?.as_deref()
    }

    /// First candidate resource whose extension is playable
    ///
    /// Pure lookup; candidates are checked in the order given.
    pub fn resolve_playable<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates
            .iter()
            .copied()
            .find(|resource| extension_of(resource).is_some_and(|ext| self.supports(ext)))
    }
}

/// File extension of a resource identifier, if any
fn extension_of(resource: &str) -> Option<&str> {
    std::path::Path::new(resource)
        .extension()
        .and_then(|extension| extension.to_str())
}

/// Read-only capability summary consumed by the correction loop
///
/// Produced before the first tick and assumed stable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    /// Hard ceiling on simultaneously registered playback units
    pub channels: usize,

    /// Whether per-channel volume writes take effect
    pub volume_supported: bool,

    /// Codec support table
    pub codecs: CodecTable,
}

impl CapabilitySnapshot {
    /// Whether any core codec resolved, i.e. audio can play at all
    pub fn playable(&self) -> bool {
        CORE_EXTENSIONS
            .iter()
            .any(|extension| self.codecs.supports(extension))
    }

    /// Degraded single-channel host
    pub fn single_channel(&self) -> bool {
        self.channels == 1
    }
}

impl Default for CapabilitySnapshot {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            volume_supported: true,
            codecs: CodecTable::new(),
        }
    }
}

/// Host audio environment description, filled in by the embedder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Environment {
    /// MIME types the host can decode and play
    pub playable_mime_types: Vec<String>,

    /// Hard limit on concurrent channels, when the host knows one
    pub channel_limit: Option<usize>,

    /// Whether per-channel volume writes take effect
    pub volume_control: bool,
}

/// Build a capability snapshot from an environment description
///
/// Pure function: the same environment always yields the same snapshot.
/// Every known extension is probed against the environment's playable MIME
/// types; unsupported extensions are recorded so later lookups stay O(1).
/// The channel ceiling is floored at one.
pub fn detect_capabilities(environment: &Environment) -> CapabilitySnapshot {
    let mut codecs = CodecTable::new();

    for (extension, candidates) in MIME_CANDIDATES {
        let supported = candidates.iter().find(|mime| {
            environment
                .playable_mime_types
                .iter()
                .any(|playable| playable.eq_ignore_ascii_case(mime))
        });
        codecs.insert(*extension, supported.map(|mime| (*mime).to_string()));
    }

    CapabilitySnapshot {
        channels: environment.channel_limit.unwrap_or(DEFAULT_CHANNELS).max(1),
        volume_supported: environment.volume_control,
        codecs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_picks_first_supported_candidate() {
        let mut codecs = CodecTable::new();
        codecs.insert("ogg", None);
        codecs.insert("mp3", Some("audio/mp3".to_string()));

        assert_eq!(
            codecs.resolve_playable(&["a.ogg", "a.mp3"]),
            Some("a.mp3")
        );
        assert_eq!(
            codecs.resolve_playable(&["first/file.ogg", "./second/file.mp3"]),
            Some("./second/file.mp3")
        );
    }

    #[test]
    fn resolve_with_empty_table_is_none() {
        let codecs = CodecTable::new();
        assert_eq!(codecs.resolve_playable(&["a.ogg", "a.mp3"]), None);
    }

    #[test]
    fn resolve_skips_resources_without_extension() {
        let mut codecs = CodecTable::new();
        codecs.insert("mp3", Some("audio/mp3".to_string()));
        assert_eq!(codecs.resolve_playable(&["noext", "a.mp3"]), Some("a.mp3"));
    }

    #[test]
    fn detect_maps_mime_types_to_extensions() {
        let environment = Environment {
            playable_mime_types: vec!["audio/mpeg".to_string(), "audio/wav".to_string()],
            channel_limit: None,
            volume_control: true,
        };

        let snapshot = detect_capabilities(&environment);
        assert!(snapshot.codecs.supports("mp3"));
        assert_eq!(snapshot.codecs.mime("mp3"), Some("audio/mpeg"));
        assert!(snapshot.codecs.supports("wav"));
        // Probed and found unsupported, not merely absent
        assert!(!snapshot.codecs.supports("ogg"));
        assert_eq!(snapshot.codecs.mime("ogg"), None);
        assert!(snapshot.playable());
    }

    #[test]
    fn detect_defaults_and_floors_channel_ceiling() {
        let environment = Environment::default();
        assert_eq!(detect_capabilities(&environment).channels, DEFAULT_CHANNELS);

        let single = Environment {
            channel_limit: Some(1),
            ..Environment::default()
        };
        let snapshot = detect_capabilities(&single);
        assert_eq!(snapshot.channels, 1);
        assert!(snapshot.single_channel());

        let zero = Environment {
            channel_limit: Some(0),
            ..Environment::default()
        };
        assert_eq!(detect_capabilities(&zero).channels, 1);
    }

    #[test]
    fn unplayable_environment_yields_unplayable_snapshot() {
        let environment = Environment {
            playable_mime_types: vec!["video/quicktime".to_string()],
            channel_limit: Some(4),
            volume_control: false,
        };

        let snapshot = detect_capabilities(&environment);
        assert!(!snapshot.playable());
        assert!(!snapshot.volume_supported);
    }
}
