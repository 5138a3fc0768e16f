//! Mixer controller - core orchestration
//!
//! Coordinates the volume store, the master play/pause snapshot, the
//! countdown timer and the per-track playback handles. "Playing" is never
//! stored: it is always read off the current volume map.

use crate::{
    catalog::TrackCatalog,
    config::MixerConfig,
    error::{MixerError, Result},
    events::{MixerEvent, Observers, SubscriptionId},
    playback::{sync_handle, PlaybackHandle},
    timer::{Clock, Countdown, SystemClock, TimerOutcome, TimerState},
    volume::{TrackVolumeStore, VolumeChange, VolumeMap},
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Ambient mixer state machine
pub struct MixerController {
    catalog: TrackCatalog,
    config: MixerConfig,
    store: TrackVolumeStore,

    /// Mix saved by the last master pause, restored on resume
    snapshot: Option<VolumeMap>,

    countdown: Countdown,
    clock: Box<dyn Clock>,

    /// Playback handles, indexed like the catalog
    handles: Vec<Option<Box<dyn PlaybackHandle>>>,

    observers: Observers,
    shut_down: bool,
}

impl MixerController {
    /// Create a controller over `catalog`
    ///
    /// Every track starts at `config.initial_volume`.
    pub fn new(
        catalog: TrackCatalog,
        config: MixerConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let store = TrackVolumeStore::new(&catalog, config.initial_volume);
        let handles = catalog.iter().map(|_| None).collect();

        Ok(Self {
            catalog,
            config,
            store,
            snapshot: None,
            countdown: Countdown::new(),
            clock: Box::new(clock),
            handles,
            observers: Observers::new(),
            shut_down: false,
        })
    }

    /// Create a controller driven by the wall clock
    pub fn with_system_clock(catalog: TrackCatalog, config: MixerConfig) -> Result<Self> {
        Self::new(catalog, config, SystemClock::new())
    }

    /// Bind the playback resource for one track
    ///
    /// The handle is immediately synced to the track's current volume. A
    /// previously attached handle is paused and dropped.
    pub fn attach_playback(&mut self, id: &str, handle: Box<dyn PlaybackHandle>) -> Result<()> {
        let index = self
            .catalog
            .index_of(id)
            .ok_or_else(|| MixerError::UnknownTrack(id.to_string()))?;

        if let Some(mut previous) = self.handles[index].replace(handle) {
            debug!(track = id, "Replacing playback handle");
            previous.pause();
        }

        self.resync_handle(index);
        Ok(())
    }

    // ===== Observers =====

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&MixerEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ===== Volume =====

    /// Set one track's volume (clamped to `[0.0, 1.0]`)
    ///
    /// Does not touch the master snapshot. Playback failures are reported
    /// through events and logs, never returned.
    ///
    /// # Errors
    /// * `UnknownTrack` - `id` is not in the catalog
    /// * `InvalidVolume` - `value` is NaN
    pub fn set_track_volume(&mut self, id: &str, value: f32) -> Result<()> {
        let change = self.store.set_volume(id, value)?;
        if change.is_empty() {
            // Same level again: nothing to publish, but a handle that failed
            // to start gets another attempt
            let index = self
                .catalog
                .index_of(id)
                .ok_or_else(|| MixerError::UnknownTrack(id.to_string()))?;
            self.resync_handle(index);
        } else {
            self.apply_change(change);
        }
        Ok(())
    }

    /// Silence every track in one update
    pub fn mute_all(&mut self) {
        let change = self.store.mute_all();
        self.apply_change(change);
    }

    /// Master play/pause
    ///
    /// Pausing saves the current mix and mutes everything; resuming restores
    /// the saved mix, or a uniform default mix if nothing was saved yet.
    /// Returns whether anything is playing afterwards.
    pub fn toggle_master_play(&mut self) -> bool {
        let change = if self.store.is_any_playing() {
            self.snapshot = Some(self.store.get_all().clone());
            debug!("Master pause, mix saved");
            self.store.mute_all()
        } else {
            let mix = self.snapshot.clone().unwrap_or_else(|| {
                VolumeMap::uniform(&self.catalog, self.config.default_volume)
            });
            debug!(saved = self.snapshot.is_some(), "Master resume");
            self.store.restore(&mix)
        };

        self.apply_change(change);
        self.is_playing()
    }

    // ===== Timer =====

    /// Start a countdown of `secs`, replacing any running one
    ///
    /// A zero duration leaves the timer idle.
    pub fn start_timer(&mut self, secs: u32) {
        let now = self.clock.now();
        self.countdown.start(secs, now, self.config.tick_period());

        if self.countdown.is_running() {
            info!(secs, "Sleep timer started");
        }
        self.publish_timer();
    }

    pub fn start_timer_minutes(&mut self, minutes: u32) {
        self.start_timer(minutes.saturating_mul(60));
    }

    /// Timer preset button
    ///
    /// Pressing the button of the running countdown cancels it; any other
    /// press (re)starts with that duration.
    pub fn toggle_timer_button(&mut self, minutes: u32) {
        let secs = minutes.saturating_mul(60);
        let timer = self.countdown.state();

        if timer.running && timer.configured_secs == secs {
            self.cancel_timer();
        } else {
            self.start_timer(secs);
        }
    }

    /// Stop the countdown; returns whether one was running
    pub fn cancel_timer(&mut self) -> bool {
        let before = self.countdown.state();
        let was_running = self.countdown.cancel();

        if was_running {
            info!(remaining = before.remaining_secs, "Sleep timer cancelled");
        }
        if before != self.countdown.state() {
            self.publish_timer();
        }
        was_running
    }

    /// Fire one countdown tick now
    ///
    /// The scheduled deadline moves forward one period, so mixing `tick`
    /// with `poll` never applies the same period twice.
    pub fn tick(&mut self) -> TimerOutcome {
        let outcome = self.countdown.tick();
        self.on_tick(outcome)
    }

    /// Apply every tick that is due on the clock; returns how many ran
    pub fn poll(&mut self) -> u32 {
        let due = self.countdown.due_ticks(self.clock.now());
        let mut applied = 0;

        for _ in 0..due {
            let outcome = self.countdown.apply_tick();
            if self.on_tick(outcome) == TimerOutcome::Idle {
                break;
            }
            applied += 1;
        }

        applied
    }

    fn on_tick(&mut self, outcome: TimerOutcome) -> TimerOutcome {
        match outcome {
            TimerOutcome::Idle => {}
            TimerOutcome::Ticked => self.publish_timer(),
            TimerOutcome::Expired => {
                info!("Sleep timer expired");
                self.publish_timer();
                self.on_timer_expired();
            }
        }

        outcome
    }

    /// Clock time at which the next tick is due
    pub fn next_tick_deadline(&self) -> Option<Duration> {
        self.countdown.next_deadline()
    }

    /// How long until the next tick is due
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_tick_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    pub fn timer(&self) -> TimerState {
        self.countdown.state()
    }

    // ===== Teardown =====

    /// Stop the countdown and pause every playback handle
    ///
    /// Safe to call more than once; also runs on drop. The countdown is
    /// cancelled on every call, including one restarted after an earlier
    /// shutdown.
    pub fn shutdown(&mut self) {
        self.countdown.cancel();
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for handle in self.handles.iter_mut().flatten() {
            handle.pause();
        }
        debug!("Mixer shut down");
    }

    // ===== State =====

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    pub fn store(&self) -> &TrackVolumeStore {
        &self.store
    }

    pub fn volumes(&self) -> &VolumeMap {
        self.store.get_all()
    }

    pub fn volume(&self, id: &str) -> Result<f32> {
        self.store.get_volume(id)
    }

    /// Aggregate flag: any track above zero
    pub fn is_playing(&self) -> bool {
        self.store.is_any_playing()
    }

    /// Mix saved by the last master pause
    pub fn snapshot(&self) -> Option<&VolumeMap> {
        self.snapshot.as_ref()
    }

    // ===== Internals =====

    fn on_timer_expired(&mut self) {
        if self.config.snapshot_on_timer_expiry && self.store.is_any_playing() {
            self.snapshot = Some(self.store.get_all().clone());
        }
        self.mute_all();
    }

    /// Push the track's current volume to its handle, publishing a failure
    fn resync_handle(&mut self, index: usize) {
        let Some(track) = self.catalog.iter().nth(index) else {
            return;
        };
        let Some(volume) = self.store.get_all().get(track.id.as_str()) else {
            return;
        };
        let Some(handle) = self.handles[index].as_deref_mut() else {
            return;
        };

        if let Err(e) = sync_handle(handle, volume) {
            warn!(track = %track.id, error = %e, "Playback failed to start");
            self.observers.publish(&MixerEvent::PlaybackFailed {
                track_id: track.id.clone(),
                message: e.to_string(),
            });
        }
    }

    /// Drive playback handles and notify observers for one store mutation
    fn apply_change(&mut self, change: VolumeChange) {
        if change.is_empty() {
            return;
        }

        let mut failures = Vec::new();
        for track in change.iter() {
            debug!(track = %track.id, from = track.previous, to = track.current, "Volume changed");

            let Some(index) = self.catalog.index_of(track.id.as_str()) else {
                continue;
            };
            if let Some(handle) = self.handles[index].as_deref_mut() {
                if let Err(e) = sync_handle(handle, track.current) {
                    warn!(track = %track.id, error = %e, "Playback failed to start");
                    failures.push((track.id.clone(), e.to_string()));
                }
            }
        }

        self.observers.publish(&MixerEvent::VolumesChanged {
            volumes: self.store.get_all().clone(),
        });
        if change.playing_changed() {
            self.observers.publish(&MixerEvent::PlayingChanged {
                playing: change.is_playing(),
            });
        }
        for (track_id, message) in failures {
            self.observers
                .publish(&MixerEvent::PlaybackFailed { track_id, message });
        }
    }

    fn publish_timer(&mut self) {
        let timer = self.countdown.state();
        self.observers.publish(&MixerEvent::TimerChanged { timer });
    }
}

impl Drop for MixerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MixerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixerController")
            .field("volumes", self.store.get_all())
            .field("snapshot", &self.snapshot)
            .field("timer", &self.countdown.state())
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
