//! Desktop playback for the Noisy ambient mixer
//!
//! This crate provides [`RodioPlayback`], the desktop implementation of the
//! mixer's `PlaybackHandle` trait: one looping `rodio` sink per track on a
//! shared output stream, with media loaded in the background from disk or
//! over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use noisy_audio_desktop::DesktopOutput;
//! use noisy_mixer::{MixerConfig, MixerController, TrackCatalog};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = DesktopOutput::open(tokio::runtime::Handle::current(), "public")?;
//!
//! let catalog = TrackCatalog::ambient();
//! let tracks: Vec<_> = catalog.iter().cloned().collect();
//! let mut mixer = MixerController::with_system_clock(catalog, MixerConfig::default())?;
//!
//! for track in &tracks {
//!     let playback = output.playback_for(track)?;
//!     mixer.attach_playback(track.id.as_str(), Box::new(playback))?;
//! }
//!
//! mixer.set_track_volume("rain", 0.5)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod error;
pub mod loader;
mod output;
mod playback;

pub use error::{AudioError, Result};
pub use loader::{MediaLoader, MediaLocator, MediaState};
pub use output::DesktopOutput;
pub use playback::RodioPlayback;
