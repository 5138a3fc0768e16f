//! Mixer configuration

use crate::error::{MixerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`MixerController`](crate::MixerController)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    /// Uniform mix restored by the master toggle when nothing was saved (default: 0.5)
    #[serde(default = "default_volume")]
    pub default_volume: f32,

    /// Volume of every track at startup (default: 0.0)
    #[serde(default)]
    pub initial_volume: f32,

    /// Timer preset buttons, in minutes (default: 15, 30, 60)
    #[serde(default = "default_timer_presets")]
    pub timer_presets_minutes: Vec<u32>,

    /// Countdown tick period in milliseconds (default: 1000)
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// Save the mix before a timer expiry mutes it (default: true)
    #[serde(default = "default_snapshot_on_timer_expiry")]
    pub snapshot_on_timer_expiry: bool,
}

impl MixerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.default_volume > 0.0 && self.default_volume <= 1.0) {
            return Err(MixerError::InvalidConfig(format!(
                "default_volume must be in (0.0, 1.0], got {}",
                self.default_volume
            )));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(MixerError::InvalidConfig(format!(
                "initial_volume must be in [0.0, 1.0], got {}",
                self.initial_volume
            )));
        }

        if self.tick_period_ms == 0 {
            return Err(MixerError::InvalidConfig(
                "tick_period_ms must be positive".to_string(),
            ));
        }

        if self.timer_presets_minutes.contains(&0) {
            return Err(MixerError::InvalidConfig(
                "timer presets must be at least one minute".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            initial_volume: 0.0,
            timer_presets_minutes: default_timer_presets(),
            tick_period_ms: default_tick_period_ms(),
            snapshot_on_timer_expiry: default_snapshot_on_timer_expiry(),
        }
    }
}

fn default_volume() -> f32 {
    0.5
}

fn default_timer_presets() -> Vec<u32> {
    vec![15, 30, 60]
}

fn default_tick_period_ms() -> u64 {
    1000
}

fn default_snapshot_on_timer_expiry() -> bool {
    true
}
