//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Operation referenced a unit id that is not registered
    #[error("Unit not registered: {0}")]
    UnitNotRegistered(String),

    /// A named sprite is missing from the unit's sprite map
    #[error("Unknown sprite \"{sprite}\" on unit {unit}")]
    UnknownSprite {
        /// Unit the lookup ran against
        unit: String,
        /// Requested sprite name
        sprite: String,
    },

    /// An offset pointer landed past the end of the resource
    #[error("Offset {0:?} is past the end of the resource")]
    OffsetOutOfBounds(std::time::Duration),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
