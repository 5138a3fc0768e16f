//! Terminal rendering of mixer state
//!
//! `StatusView` is the observer side of the mixer: it only ever learns
//! about state through pushed `MixerEvent`s.

use noisy_mixer::{MixerEvent, TimerState, TrackCatalog, TrackId, VolumeMap};
use std::fmt::Write;

/// Rendered copy of everything the widget displays
#[derive(Debug, Clone)]
pub struct StatusView {
    names: Vec<(TrackId, String)>,
    volumes: VolumeMap,
    playing: bool,
    timer: TimerState,
    presets: Vec<u32>,
}

impl StatusView {
    pub fn new(catalog: &TrackCatalog, volumes: VolumeMap, timer: TimerState, presets: Vec<u32>) -> Self {
        Self {
            names: catalog
                .iter()
                .map(|track| (track.id.clone(), track.name.clone()))
                .collect(),
            playing: volumes.is_any_playing(),
            volumes,
            timer,
            presets,
        }
    }

    /// Fold one event into the view; returns whether the line should be redrawn
    pub fn apply(&mut self, event: &MixerEvent) -> bool {
        match event {
            MixerEvent::VolumesChanged { volumes } => {
                self.volumes = volumes.clone();
                true
            }
            MixerEvent::PlayingChanged { playing } => {
                self.playing = *playing;
                true
            }
            MixerEvent::TimerChanged { timer } => {
                self.timer = *timer;
                true
            }
            MixerEvent::PlaybackFailed { .. } => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    /// One-line summary: play state, per-track levels, timer and presets
    pub fn render(&self) -> String {
        let mut line = String::new();
        line.push_str(if self.playing { "▶" } else { "⏸" });

        for (id, name) in &self.names {
            let volume = self.volumes.get(id.as_str()).unwrap_or(0.0);
            let _ = write!(line, "  {name} {:>3}%", (volume * 100.0).round() as u32);
        }

        let _ = write!(line, "  |  ⏱ {}", self.timer.label());
        for minutes in &self.presets {
            if self.timer.is_preset_active(*minutes) {
                let _ = write!(line, " [{minutes}m]");
            } else {
                let _ = write!(line, " {minutes}m");
            }
        }

        line
    }
}
