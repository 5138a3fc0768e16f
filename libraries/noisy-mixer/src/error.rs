//! Error types for the mixer core

use thiserror::Error;

/// Mixer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixerError {
    /// Track id is not part of the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    /// Volume cannot be interpreted (NaN)
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Catalog rejected at construction
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MixerError {
    /// Whether this error is caller misuse (bad track id or volume)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::UnknownTrack(_) | Self::InvalidVolume(_))
    }
}

/// Errors reported by a host playback handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The playback resource could not start (not loaded yet, device gone, ...)
    #[error("Playback resource unavailable: {0}")]
    Unavailable(String),
}

/// Result type for mixer operations
pub type Result<T> = std::result::Result<T, MixerError>;
