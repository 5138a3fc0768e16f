/// Desktop audio errors
use noisy_mixer::PlaybackError;
use thiserror::Error;

/// Result type for desktop audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to open the output stream
    #[error("Failed to open output stream: {0}")]
    StreamError(String),

    /// Media could not be decoded
    #[error("Failed to decode media: {0}")]
    DecodeError(String),

    /// Media locator could not be resolved
    #[error("Invalid media locator: {0}")]
    InvalidLocator(String),

    /// Remote fetch failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rodio::StreamError> for AudioError {
    fn from(err: rodio::StreamError) -> Self {
        AudioError::StreamError(err.to_string())
    }
}

impl From<rodio::decoder::DecoderError> for AudioError {
    fn from(err: rodio::decoder::DecoderError) -> Self {
        AudioError::DecodeError(err.to_string())
    }
}

impl From<AudioError> for PlaybackError {
    fn from(err: AudioError) -> Self {
        PlaybackError::Unavailable(err.to_string())
    }
}
