//! Looping rodio playback handle
//!
//! Each track owns one `Sink` on the shared output mixer. The decoded
//! source is appended once, looped forever, and then only paused, resumed
//! and re-leveled.

use crate::error::AudioError;
use crate::loader::{MediaLoader, MediaLocator, MediaState};
use noisy_mixer::{PlaybackError, PlaybackHandle};
use rodio::{Decoder, Sink, Source};
use std::io::Cursor;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Desktop playback resource for one track
pub struct RodioPlayback {
    track_id: String,
    sink: Sink,
    locator: MediaLocator,
    loader: MediaLoader,
    media: watch::Receiver<MediaState>,

    /// Whether the looping source has been appended to the sink
    attached: bool,
}

impl RodioPlayback {
    /// Wrap a sink and start loading its media
    ///
    /// The sink is paused until the mixer asks it to play.
    pub fn new(track_id: impl Into<String>, sink: Sink, locator: MediaLocator, loader: MediaLoader) -> Self {
        let media = loader.load(locator.clone());
        sink.pause();

        Self {
            track_id: track_id.into(),
            sink,
            locator,
            loader,
            media,
            attached: false,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Current load progress of this track's media
    pub fn media_state(&self) -> MediaState {
        self.media.borrow().clone()
    }

    /// Wait until the media has finished loading (successfully or not)
    pub async fn wait_loaded(&mut self) -> MediaState {
        match self.media.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => MediaState::Failed("loader stopped".to_string()),
        }
    }

    /// Append the looping source once media is available
    fn ensure_attached(&mut self) -> Result<(), PlaybackError> {
        if self.attached {
            return Ok(());
        }

        let state = self.media.borrow().clone();
        match state {
            MediaState::Loading => Err(PlaybackError::Unavailable(format!(
                "{} is still loading",
                self.track_id
            ))),
            MediaState::Failed(message) => {
                // Kick off a fresh attempt; a later play() can pick it up
                self.media = self.loader.load(self.locator.clone());
                Err(PlaybackError::Unavailable(message))
            }
            MediaState::Ready(bytes) => {
                let decoder = match Decoder::new(Cursor::new(bytes)) {
                    Ok(decoder) => decoder,
                    Err(e) => {
                        let message = AudioError::from(e).to_string();
                        warn!(track = %self.track_id, error = %message, "Media could not be decoded");
                        // Drop the bad bytes; the next play() reloads from the source
                        let (_, failed) = watch::channel(MediaState::Failed(message.clone()));
                        self.media = failed;
                        return Err(PlaybackError::Unavailable(message));
                    }
                };
                self.sink.append(decoder.repeat_infinite());
                self.attached = true;
                debug!(track = %self.track_id, "Looping source attached");
                Ok(())
            }
        }
    }
}

impl PlaybackHandle for RodioPlayback {
    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.ensure_attached()?;
        if self.sink.is_paused() {
            info!(track = %self.track_id, "Playing");
            self.sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.sink.is_paused() {
            info!(track = %self.track_id, "Paused");
            self.sink.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }
}
