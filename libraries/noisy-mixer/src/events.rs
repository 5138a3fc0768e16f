//! Mixer events
//!
//! Push-only notifications for the rendering layer. Events are emitted:
//! - once per effective volume mutation (single or mute-all)
//! - when the aggregate "anything playing" flag flips
//! - on every countdown start, tick, cancel and expiry
//! - when a playback resource fails to start

use crate::catalog::TrackId;
use crate::timer::TimerState;
use crate::volume::VolumeMap;
use serde::{Deserialize, Serialize};

/// Events emitted by the mixer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MixerEvent {
    /// New immutable snapshot of every track's volume
    VolumesChanged {
        /// Volumes after the mutation
        volumes: VolumeMap,
    },

    /// Aggregate playback flag changed
    PlayingChanged {
        /// Whether any track is audible
        playing: bool,
    },

    /// Countdown state changed
    TimerChanged {
        /// State after the change
        timer: TimerState,
    },

    /// A track's playback resource failed to start
    PlaybackFailed {
        /// Affected track
        track_id: TrackId,
        /// Error message from the host
        message: String,
    },
}

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&MixerEvent) + Send>;

/// Listener registry, notified synchronously in subscription order
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&MixerEvent) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: &MixerEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
