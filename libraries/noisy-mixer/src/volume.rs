//! Per-track volume state
//!
//! `VolumeMap` is total over the catalog: every known track id has exactly
//! one entry, in catalog order. `TrackVolumeStore` is the only writer and
//! reports every effective mutation as a single `VolumeChange`.

use crate::catalog::{TrackCatalog, TrackId};
use crate::error::{MixerError, Result};
use serde::{Deserialize, Serialize};

/// Lowest accepted volume
pub const MIN_VOLUME: f32 = 0.0;

/// Highest accepted volume
pub const MAX_VOLUME: f32 = 1.0;

/// Clamp a requested volume into `[0.0, 1.0]`
///
/// NaN cannot be clamped meaningfully and is rejected.
pub fn normalize_volume(value: f32) -> Result<f32> {
    if value.is_nan() {
        return Err(MixerError::InvalidVolume(value));
    }
    let clamped = value.clamp(MIN_VOLUME, MAX_VOLUME);
    // Collapse -0.0 so "== 0.0" and "> 0.0" checks stay unambiguous
    Ok(if clamped == 0.0 { 0.0 } else { clamped })
}

/// Immutable mapping from track id to volume, in catalog order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMap {
    entries: Vec<(TrackId, f32)>,
}

impl VolumeMap {
    /// Every catalog track at the same volume (clamped)
    pub fn uniform(catalog: &TrackCatalog, volume: f32) -> Self {
        let volume = normalize_volume(volume).unwrap_or(MIN_VOLUME);
        Self {
            entries: catalog.ids().map(|id| (id.clone(), volume)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(track, _)| track.as_str() == id)
            .map(|(_, volume)| *volume)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackId, f32)> {
        self.entries.iter().map(|(id, volume)| (id, *volume))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate playback flag: some track has volume above zero
    pub fn is_any_playing(&self) -> bool {
        self.entries.iter().any(|(_, volume)| *volume > 0.0)
    }

    pub fn is_silent(&self) -> bool {
        !self.is_any_playing()
    }
}

/// One track's volume transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackVolumeChange<'a> {
    pub id: &'a TrackId,
    pub previous: f32,
    pub current: f32,
}

/// Effective changes produced by one store mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeChange {
    changes: Vec<(TrackId, f32, f32)>,
    was_playing: bool,
    is_playing: bool,
}

impl VolumeChange {
    /// Whether nothing actually changed
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TrackVolumeChange<'_>> {
        self.changes
            .iter()
            .map(|(id, previous, current)| TrackVolumeChange {
                id,
                previous: *previous,
                current: *current,
            })
    }

    /// Aggregate flag before the mutation
    pub fn was_playing(&self) -> bool {
        self.was_playing
    }

    /// Aggregate flag after the mutation
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether the aggregate flag flipped
    pub fn playing_changed(&self) -> bool {
        self.was_playing != self.is_playing
    }
}

/// Holds the current volume of every catalog track
#[derive(Debug, Clone)]
pub struct TrackVolumeStore {
    volumes: VolumeMap,
}

impl TrackVolumeStore {
    /// Create a store with every track at `initial` (clamped)
    pub fn new(catalog: &TrackCatalog, initial: f32) -> Self {
        Self {
            volumes: VolumeMap::uniform(catalog, initial),
        }
    }

    /// Set one track's volume
    ///
    /// Out-of-range values are clamped; NaN and unknown ids are rejected
    /// and leave the store untouched.
    pub fn set_volume(&mut self, id: &str, value: f32) -> Result<VolumeChange> {
        let value = normalize_volume(value)?;
        if self.volumes.get(id).is_none() {
            return Err(MixerError::UnknownTrack(id.to_string()));
        }
        Ok(self.apply(|track| (track.as_str() == id).then_some(value)))
    }

    /// Silence every track in one update
    pub fn mute_all(&mut self) -> VolumeChange {
        self.apply(|_| Some(0.0))
    }

    /// Replace the mix with `mix`, ignoring ids the store does not know
    pub fn restore(&mut self, mix: &VolumeMap) -> VolumeChange {
        self.apply(|track| {
            mix.get(track.as_str())
                .and_then(|v| normalize_volume(v).ok())
        })
    }

    pub fn get_volume(&self, id: &str) -> Result<f32> {
        self.volumes
            .get(id)
            .ok_or_else(|| MixerError::UnknownTrack(id.to_string()))
    }

    pub fn get_all(&self) -> &VolumeMap {
        &self.volumes
    }

    pub fn is_any_playing(&self) -> bool {
        self.volumes.is_any_playing()
    }

    /// Apply `next(id)` to every track and collect effective changes
    fn apply(&mut self, mut next: impl FnMut(&TrackId) -> Option<f32>) -> VolumeChange {
        let was_playing = self.volumes.is_any_playing();
        let mut changes = Vec::new();

        for (id, volume) in &mut self.volumes.entries {
            if let Some(value) = next(&*id) {
                if value != *volume {
                    changes.push((id.clone(), *volume, value));
                    *volume = value;
                }
            }
        }

        VolumeChange {
            changes,
            was_playing,
            is_playing: self.volumes.is_any_playing(),
        }
    }
}
