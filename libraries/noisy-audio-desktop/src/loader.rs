//! Background media loading
//!
//! Track sources are read from disk or fetched over HTTP on the tokio
//! runtime, never on the caller's thread. Progress is published through a
//! `watch` channel so a playback handle can check readiness without
//! blocking.

use crate::error::{AudioError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};
use url::Url;

/// Where a track's media lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLocator {
    /// Local file
    File(PathBuf),

    /// Remote http(s) resource
    Remote(Url),
}

impl MediaLocator {
    /// Resolve a catalog source string
    ///
    /// - `http://` / `https://` URLs are fetched remotely
    /// - `file://` URLs map to their path
    /// - root-relative paths (`/sounds/rain.mp3`) resolve under `media_root`
    ///   unless they already exist as absolute paths
    /// - relative paths resolve under `media_root`
    pub fn resolve(source: &str, media_root: &Path) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(AudioError::InvalidLocator("empty source".to_string()));
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source)
                .map_err(|e| AudioError::InvalidLocator(format!("{source}: {e}")))?;
            return Ok(Self::Remote(url));
        }

        if source.starts_with("file://") {
            let url = Url::parse(source)
                .map_err(|e| AudioError::InvalidLocator(format!("{source}: {e}")))?;
            let path = url
                .to_file_path()
                .map_err(|()| AudioError::InvalidLocator(source.to_string()))?;
            return Ok(Self::File(path));
        }

        let path = Path::new(source);
        if path.is_absolute() && path.exists() {
            return Ok(Self::File(path.to_path_buf()));
        }

        Ok(Self::File(media_root.join(source.trim_start_matches('/'))))
    }
}

impl std::fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// Load progress of one media resource
#[derive(Debug, Clone)]
pub enum MediaState {
    /// Fetch in flight
    Loading,

    /// Encoded bytes available
    Ready(Arc<[u8]>),

    /// Fetch failed
    Failed(String),
}

impl MediaState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Spawns media fetches on a tokio runtime
#[derive(Debug, Clone)]
pub struct MediaLoader {
    client: reqwest::Client,
    runtime: Handle,
}

impl MediaLoader {
    pub fn new(runtime: Handle) -> Self {
        Self {
            client: reqwest::Client::new(),
            runtime,
        }
    }

    /// Start loading `locator` in the background
    pub fn load(&self, locator: MediaLocator) -> watch::Receiver<MediaState> {
        let (tx, rx) = watch::channel(MediaState::Loading);
        let client = self.client.clone();

        self.runtime.spawn(async move {
            let state = match fetch(&client, &locator).await {
                Ok(bytes) => {
                    debug!(source = %locator, bytes = bytes.len(), "Media loaded");
                    MediaState::Ready(bytes.into())
                }
                Err(e) => {
                    warn!(source = %locator, error = %e, "Media load failed");
                    MediaState::Failed(e.to_string())
                }
            };
            // Receiver may already be gone if the handle was dropped
            let _ = tx.send(state);
        });

        rx
    }
}

/// Read a media resource fully into memory
pub async fn fetch(client: &reqwest::Client, locator: &MediaLocator) -> Result<Vec<u8>> {
    match locator {
        MediaLocator::File(path) => Ok(tokio::fs::read(path).await?),
        MediaLocator::Remote(url) => {
            let response = client.get(url.clone()).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
    }
}
