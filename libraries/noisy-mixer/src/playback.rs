//! Platform-agnostic playback handle trait
//!
//! Each catalog track is bound to one host playback resource that loops its
//! source forever. The mixer only pushes volume and play/pause decisions.

use crate::error::PlaybackError;

/// Host playback resource for a single looping track
///
/// Implementors wrap whatever the platform offers (an audio sink on
/// desktop, a media element on the web, a mock in tests).
pub trait PlaybackHandle: Send {
    /// Set output volume in `[0.0, 1.0]`
    fn set_volume(&mut self, volume: f32);

    /// Start or resume looping playback; no-op if already playing
    ///
    /// # Returns
    /// * `Ok(())` - Resource is playing
    /// * `Err(_)` - Resource could not start (e.g. media still loading)
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback; no-op if already paused
    fn pause(&mut self);

    /// Whether the resource is currently paused
    fn is_paused(&self) -> bool;
}

/// Bring `handle` in line with a track's new volume
///
/// Volume is pushed unconditionally. A paused handle is started when the
/// volume is above zero; a playing handle is paused when it is exactly zero.
pub fn sync_handle(handle: &mut dyn PlaybackHandle, volume: f32) -> Result<(), PlaybackError> {
    handle.set_volume(volume);

    if volume > 0.0 {
        if handle.is_paused() {
            handle.play()?;
        }
    } else if !handle.is_paused() {
        handle.pause();
    }

    Ok(())
}

/// Handle with no audio behind it
///
/// Tracks state only; used when no output device is available.
#[derive(Debug, Clone)]
pub struct NullPlayback {
    volume: f32,
    paused: bool,
}

impl NullPlayback {
    pub fn new() -> Self {
        Self {
            volume: 0.0,
            paused: true,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for NullPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackHandle for NullPlayback {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
