//! Noisy - Ambient Mixer Core
//!
//! Platform-agnostic state for blending looping ambient tracks.
//!
//! This crate provides:
//! - A fixed track catalog (rain, forest, ocean, summer night by default)
//! - Per-track volume store (0.0-1.0, clamped, mute-all)
//! - Master play/pause with snapshot-and-restore
//! - Countdown sleep timer that mutes everything on expiry
//! - Push-only events for the rendering layer
//!
//! # Architecture
//!
//! `noisy-mixer` has no audio, I/O or async runtime dependency. Audio output
//! is plugged in per track through the [`PlaybackHandle`] trait, and time
//! through the [`Clock`] trait, so tests advance a [`ManualClock`] instead
//! of sleeping.
//!
//! # Example: Mixing
//!
//! ```rust
//! use noisy_mixer::{MixerConfig, MixerController, TrackCatalog};
//!
//! let mut mixer =
//!     MixerController::with_system_clock(TrackCatalog::ambient(), MixerConfig::default())?;
//!
//! mixer.set_track_volume("rain", 0.5)?;
//! assert!(mixer.is_playing());
//!
//! // Pause everything, then bring the same mix back
//! mixer.toggle_master_play();
//! assert!(!mixer.is_playing());
//! mixer.toggle_master_play();
//! assert_eq!(mixer.volume("rain")?, 0.5);
//! # Ok::<(), noisy_mixer::MixerError>(())
//! ```
//!
//! # Example: Sleep Timer
//!
//! ```rust
//! use noisy_mixer::{ManualClock, MixerConfig, MixerController, TrackCatalog};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let mut mixer =
//!     MixerController::new(TrackCatalog::ambient(), MixerConfig::default(), clock.clone())?;
//!
//! mixer.set_track_volume("ocean", 0.8)?;
//! mixer.toggle_timer_button(15);
//! assert_eq!(mixer.timer().label(), "15:00");
//!
//! clock.advance(Duration::from_secs(15 * 60));
//! mixer.poll();
//! assert!(!mixer.is_playing());
//! # Ok::<(), noisy_mixer::MixerError>(())
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust
//! use noisy_mixer::{MixerConfig, MixerController, PlaybackError, PlaybackHandle, TrackCatalog};
//!
//! struct MySink {
//!     paused: bool,
//! }
//!
//! impl PlaybackHandle for MySink {
//!     fn set_volume(&mut self, _volume: f32) {}
//!
//!     fn play(&mut self) -> Result<(), PlaybackError> {
//!         self.paused = false;
//!         Ok(())
//!     }
//!
//!     fn pause(&mut self) {
//!         self.paused = true;
//!     }
//!
//!     fn is_paused(&self) -> bool {
//!         self.paused
//!     }
//! }
//!
//! let catalog = TrackCatalog::ambient();
//! let ids: Vec<String> = catalog.ids().map(|id| id.to_string()).collect();
//! let mut mixer = MixerController::with_system_clock(catalog, MixerConfig::default())?;
//! for id in &ids {
//!     mixer.attach_playback(id, Box::new(MySink { paused: true }))?;
//! }
//! # Ok::<(), noisy_mixer::MixerError>(())
//! ```

mod catalog;
mod config;
mod controller;
mod error;
pub mod events;
pub mod playback;
pub mod timer;
mod volume;

// Public exports
pub use catalog::{Track, TrackCatalog, TrackId};
pub use config::MixerConfig;
pub use controller::MixerController;
pub use error::{MixerError, PlaybackError, Result};
pub use events::{MixerEvent, Observers, SubscriptionId};
pub use playback::{NullPlayback, PlaybackHandle};
pub use timer::{Clock, ManualClock, SystemClock, TimerOutcome, TimerState};
pub use volume::{
    normalize_volume, TrackVolumeChange, TrackVolumeStore, VolumeChange, VolumeMap, MAX_VOLUME,
    MIN_VOLUME,
};
