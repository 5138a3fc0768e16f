//! Integration tests for the mixer controller
//!
//! These tests drive the controller the way the widget does: slider drags,
//! master toggle presses and playback handles that can fail.

use noisy_mixer::{
    ManualClock, MixerConfig, MixerController, MixerError, MixerEvent, PlaybackError,
    PlaybackHandle, TrackCatalog,
};
use std::sync::{Arc, Mutex};

// ===== Test Helpers =====

/// Calls observed on a mock handle
#[derive(Debug, Default)]
struct HandleLog {
    volume: f32,
    paused: bool,
    plays: u32,
    pauses: u32,
    fail_next_plays: u32,
}

/// Playback handle that records calls into a shared log
struct MockPlayback {
    log: Arc<Mutex<HandleLog>>,
}

impl MockPlayback {
    fn new() -> (Self, Arc<Mutex<HandleLog>>) {
        let log = Arc::new(Mutex::new(HandleLog {
            paused: true,
            ..HandleLog::default()
        }));
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl PlaybackHandle for MockPlayback {
    fn set_volume(&mut self, volume: f32) {
        self.log.lock().unwrap().volume = volume;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_next_plays > 0 {
            log.fail_next_plays -= 1;
            return Err(PlaybackError::Unavailable("media still loading".to_string()));
        }
        log.plays += 1;
        log.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.pauses += 1;
        log.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.log.lock().unwrap().paused
    }
}

fn mixer() -> MixerController {
    MixerController::new(
        TrackCatalog::ambient(),
        MixerConfig::default(),
        ManualClock::new(),
    )
    .unwrap()
}

/// Mixer with a mock handle on every track
fn mixer_with_handles() -> (MixerController, Vec<(String, Arc<Mutex<HandleLog>>)>) {
    let mut mixer = mixer();
    let ids: Vec<String> = mixer.catalog().ids().map(|id| id.to_string()).collect();

    let mut logs = Vec::new();
    for id in ids {
        let (handle, log) = MockPlayback::new();
        mixer.attach_playback(&id, Box::new(handle)).unwrap();
        logs.push((id, log));
    }
    (mixer, logs)
}

fn log_for<'a>(logs: &'a [(String, Arc<Mutex<HandleLog>>)], id: &str) -> &'a Arc<Mutex<HandleLog>> {
    &logs.iter().find(|(track, _)| track == id).unwrap().1
}

fn record_events(mixer: &mut MixerController) -> Arc<Mutex<Vec<MixerEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    mixer.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

// ===== Scenarios =====

#[test]
fn test_pause_and_resume_restores_rain() {
    let mut mixer = mixer();
    assert!(mixer.volumes().is_silent());

    mixer.set_track_volume("rain", 0.5).unwrap();
    assert!(mixer.is_playing());

    mixer.toggle_master_play();
    assert!(mixer.volumes().iter().all(|(_, v)| v == 0.0));
    let snapshot = mixer.snapshot().unwrap();
    assert_eq!(snapshot.get("rain"), Some(0.5));
    assert_eq!(snapshot.get("forest"), Some(0.0));

    mixer.toggle_master_play();
    assert_eq!(mixer.volume("rain").unwrap(), 0.5);
    assert_eq!(mixer.volume("ocean").unwrap(), 0.0);
    assert!(mixer.is_playing());
}

#[test]
fn test_slider_to_zero_does_not_touch_snapshot() {
    let mut mixer = mixer();
    mixer.set_track_volume("forest", 0.9).unwrap();
    mixer.toggle_master_play();
    mixer.toggle_master_play();

    mixer.set_track_volume("forest", 0.0).unwrap();
    assert!(!mixer.is_playing());
    assert_eq!(mixer.snapshot().and_then(|s| s.get("forest")), Some(0.9));

    // Resuming brings back the last master-paused mix
    mixer.toggle_master_play();
    assert_eq!(mixer.volume("forest").unwrap(), 0.9);
}

#[test]
fn test_unknown_track_is_invalid_argument() {
    let mut mixer = mixer();
    let err = mixer.set_track_volume("wind", 0.5).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err, MixerError::UnknownTrack("wind".to_string()));
    assert!(mixer.volumes().is_silent());
}

#[test]
fn test_out_of_range_volume_is_clamped() {
    let mut mixer = mixer();
    mixer.set_track_volume("summer", 4.0).unwrap();
    assert_eq!(mixer.volume("summer").unwrap(), 1.0);

    mixer.set_track_volume("summer", -1.0).unwrap();
    assert_eq!(mixer.volume("summer").unwrap(), 0.0);
}

// ===== Playback Handles =====

#[test]
fn test_handles_follow_zero_crossings() {
    let (mut mixer, logs) = mixer_with_handles();
    let rain = log_for(&logs, "rain");

    mixer.set_track_volume("rain", 0.3).unwrap();
    mixer.set_track_volume("rain", 0.6).unwrap();
    {
        let log = rain.lock().unwrap();
        assert_eq!(log.plays, 1);
        assert_eq!(log.volume, 0.6);
        assert!(!log.paused);
    }

    mixer.set_track_volume("rain", 0.0).unwrap();
    let log = rain.lock().unwrap();
    assert_eq!(log.pauses, 1);
    assert!(log.paused);
    assert_eq!(log.volume, 0.0);
}

#[test]
fn test_mute_all_pauses_every_playing_handle() {
    let (mut mixer, logs) = mixer_with_handles();
    mixer.set_track_volume("rain", 0.3).unwrap();
    mixer.set_track_volume("ocean", 0.4).unwrap();

    mixer.mute_all();

    for (id, log) in &logs {
        let log = log.lock().unwrap();
        assert!(log.paused, "{id} should be paused");
    }
    assert_eq!(log_for(&logs, "rain").lock().unwrap().pauses, 1);
    assert_eq!(log_for(&logs, "forest").lock().unwrap().pauses, 0);
}

#[test]
fn test_playback_failure_keeps_volume_and_retries() {
    let (mut mixer, logs) = mixer_with_handles();
    let events = record_events(&mut mixer);
    let ocean = log_for(&logs, "ocean");
    ocean.lock().unwrap().fail_next_plays = 1;

    mixer.set_track_volume("ocean", 0.5).unwrap();
    assert_eq!(mixer.volume("ocean").unwrap(), 0.5);
    assert!(mixer.is_playing());
    assert!(ocean.lock().unwrap().paused);
    assert!(events.lock().unwrap().iter().any(|e| matches!(
        e,
        MixerEvent::PlaybackFailed { track_id, .. } if track_id.as_str() == "ocean"
    )));

    // Any later volume set retries the start
    mixer.set_track_volume("ocean", 0.55).unwrap();
    let log = ocean.lock().unwrap();
    assert!(!log.paused);
    assert_eq!(log.plays, 1);
}

#[test]
fn test_same_volume_reset_retries_failed_start() {
    let (mut mixer, logs) = mixer_with_handles();
    let rain = log_for(&logs, "rain");
    rain.lock().unwrap().fail_next_plays = 1;

    mixer.set_track_volume("rain", 0.5).unwrap();
    assert!(rain.lock().unwrap().paused);

    let events = record_events(&mut mixer);
    mixer.set_track_volume("rain", 0.5).unwrap();

    let log = rain.lock().unwrap();
    assert!(!log.paused);
    assert_eq!(log.plays, 1);
    // Volume did not change, so nothing is published
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_same_volume_reset_reports_repeated_failure() {
    let (mut mixer, logs) = mixer_with_handles();
    let rain = log_for(&logs, "rain");
    rain.lock().unwrap().fail_next_plays = 2;

    mixer.set_track_volume("rain", 0.5).unwrap();
    let events = record_events(&mut mixer);
    mixer.set_track_volume("rain", 0.5).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        MixerEvent::PlaybackFailed { track_id, .. } if track_id.as_str() == "rain"
    ));
    assert!(rain.lock().unwrap().paused);
    assert_eq!(mixer.volume("rain").unwrap(), 0.5);
}

#[test]
fn test_attach_syncs_to_current_volume() {
    let mut mixer = mixer();
    mixer.set_track_volume("forest", 0.7).unwrap();

    let (handle, log) = MockPlayback::new();
    mixer.attach_playback("forest", Box::new(handle)).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.volume, 0.7);
    assert_eq!(log.plays, 1);
}

#[test]
fn test_drop_pauses_handles_and_stops_timer() {
    let (mut mixer, logs) = mixer_with_handles();
    mixer.set_track_volume("summer", 0.2).unwrap();
    mixer.start_timer(600);

    drop(mixer);

    assert!(log_for(&logs, "summer").lock().unwrap().paused);
}

// ===== Events =====

#[test]
fn test_mute_all_publishes_single_volume_event() {
    let mut mixer = mixer();
    mixer.set_track_volume("rain", 0.5).unwrap();
    mixer.set_track_volume("forest", 0.5).unwrap();
    mixer.set_track_volume("ocean", 0.5).unwrap();

    let events = record_events(&mut mixer);
    mixer.mute_all();

    let events = events.lock().unwrap();
    let volume_events: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, MixerEvent::VolumesChanged { .. }))
        .collect();
    assert_eq!(volume_events.len(), 1);
    match volume_events[0] {
        MixerEvent::VolumesChanged { volumes } => assert!(volumes.is_silent()),
        other => panic!("unexpected event {other:?}"),
    }
    assert!(events.contains(&MixerEvent::PlayingChanged { playing: false }));
}

#[test]
fn test_playing_changed_only_on_flip() {
    let mut mixer = mixer();
    let events = record_events(&mut mixer);

    mixer.set_track_volume("rain", 0.2).unwrap();
    mixer.set_track_volume("rain", 0.4).unwrap();
    mixer.set_track_volume("forest", 0.4).unwrap();

    let flips = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, MixerEvent::PlayingChanged { .. }))
        .count();
    assert_eq!(flips, 1);
}

#[test]
fn test_noop_writes_publish_nothing() {
    let mut mixer = mixer();
    let events = record_events(&mut mixer);

    mixer.set_track_volume("rain", 0.0).unwrap();
    mixer.mute_all();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_unsubscribed_listener_is_silent() {
    let mut mixer = mixer();
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let id = mixer.subscribe(move |_| *sink.lock().unwrap() += 1);

    mixer.set_track_volume("rain", 0.1).unwrap();
    assert!(mixer.unsubscribe(id));
    mixer.set_track_volume("rain", 0.2).unwrap();

    assert_eq!(*count.lock().unwrap(), 2); // VolumesChanged + PlayingChanged
}
