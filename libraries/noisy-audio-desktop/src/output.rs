//! Default output device

use crate::error::Result;
use crate::loader::{MediaLoader, MediaLocator};
use crate::playback::RodioPlayback;
use noisy_mixer::Track;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tracing::info;

/// Open output stream shared by every track's sink
///
/// Dropping it stops all audio, so it must outlive the mixer's handles.
pub struct DesktopOutput {
    stream: OutputStream,
    loader: MediaLoader,
    media_root: PathBuf,
}

impl DesktopOutput {
    /// Open the default output device
    ///
    /// # Arguments
    /// * `runtime` - Runtime used for background media loading
    /// * `media_root` - Directory that root-relative track sources resolve under
    pub fn open(runtime: Handle, media_root: impl Into<PathBuf>) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);
        info!("Opened default audio output");

        Ok(Self {
            stream,
            loader: MediaLoader::new(runtime),
            media_root: media_root.into(),
        })
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Create the looping playback handle for `track`
    ///
    /// Media starts loading immediately in the background.
    pub fn playback_for(&self, track: &Track) -> Result<RodioPlayback> {
        let locator = MediaLocator::resolve(&track.source, &self.media_root)?;
        info!(track = %track.id, source = %locator, "Loading track");

        let sink = Sink::connect_new(self.stream.mixer());
        Ok(RodioPlayback::new(
            track.id.as_str(),
            sink,
            locator,
            self.loader.clone(),
        ))
    }
}
