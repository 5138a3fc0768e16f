//! Track catalog
//!
//! The fixed, ordered set of ambient tracks known at startup. The catalog
//! is read-only for the lifetime of a mixer; every volume map is keyed by
//! exactly these ids, in this order.

use crate::error::{MixerError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// Unique identifier of a track within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for TrackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Immutable descriptor of one ambient sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier
    pub id: TrackId,

    /// Display name
    pub name: String,

    /// Media locator: filesystem path, `file://` or `http(s)://` URL
    pub source: String,

    /// Icon reference for the rendering layer
    #[serde(default)]
    pub icon: String,
}

impl Track {
    pub fn new(
        id: impl Into<TrackId>,
        name: impl Into<String>,
        source: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: source.into(),
            icon: icon.into(),
        }
    }
}

/// Ordered, validated set of tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    /// Build a catalog, rejecting empty catalogs, empty ids and duplicates
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(MixerError::InvalidCatalog(
                "catalog must contain at least one track".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if track.id.as_str().trim().is_empty() {
                return Err(MixerError::InvalidCatalog(format!(
                    "track '{}' has an empty id",
                    track.name
                )));
            }
            if !seen.insert(track.id.as_str()) {
                return Err(MixerError::InvalidCatalog(format!(
                    "duplicate track id '{}'",
                    track.id
                )));
            }
        }

        Ok(Self { tracks })
    }

    /// The built-in ambient set: rain, forest, ocean and summer night
    pub fn ambient() -> Self {
        Self {
            tracks: vec![
                Track::new("rain", "Rain", "/sounds/rain.mp3", "cloud-rain"),
                Track::new(
                    "forest",
                    "Forest",
                    "https://cdn.pixabay.com/audio/2022/09/20/audio_b72410a539.mp3",
                    "forest",
                ),
                Track::new("ocean", "Ocean", "/sounds/ocean.mp3", "waves"),
                Track::new("summer", "Summer Night", "/sounds/sun.mp3", "sun"),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position of a track in catalog order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id.as_str() == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TrackId> {
        self.tracks.iter().map(|t| &t.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
