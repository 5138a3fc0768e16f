/// Application configuration
use anyhow::{Context, Result};
use noisy_mixer::{MixerConfig, Track, TrackCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "noisy.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mixer: MixerConfig,

    /// Track catalog; the built-in ambient set when empty
    #[serde(default)]
    pub tracks: Vec<Track>,

    #[serde(default)]
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    /// Open the default output device (false: silent handles)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory that root-relative track sources resolve under
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            media_root: default_media_root(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `noisy.toml` is read if present.
    /// `NOISY_*` variables override file values, with `__` separating
    /// sections (e.g. `NOISY_MIXER__DEFAULT_VOLUME=0.3`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("NOISY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.mixer.validate()?;
        self.catalog()?;
        Ok(())
    }

    /// Build the track catalog
    pub fn catalog(&self) -> Result<TrackCatalog> {
        if self.tracks.is_empty() {
            return Ok(TrackCatalog::ambient());
        }
        Ok(TrackCatalog::new(self.tracks.clone())?)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./public")
}
