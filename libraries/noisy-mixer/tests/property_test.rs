//! Property-based tests for the mixer
//!
//! Uses proptest to verify invariants across random mixes and operation
//! sequences.

use noisy_mixer::{ManualClock, MixerConfig, MixerController, TrackCatalog, TrackVolumeStore};
use proptest::prelude::*;
use std::time::Duration;

const TRACKS: [&str; 4] = ["rain", "forest", "ocean", "summer"];

// ===== Helpers =====

fn mixer() -> (MixerController, ManualClock) {
    let clock = ManualClock::new();
    let mixer =
        MixerController::new(TrackCatalog::ambient(), MixerConfig::default(), clock.clone())
            .unwrap();
    (mixer, clock)
}

#[derive(Debug, Clone)]
enum Op {
    SetVolume(usize, f32),
    MuteAll,
    ToggleMaster,
    StartTimer(u32),
    ToggleTimer(u32),
    Advance(u64),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, -0.5f32..1.5).prop_map(|(t, v)| Op::SetVolume(t, v)),
        Just(Op::MuteAll),
        Just(Op::ToggleMaster),
        (0u32..5).prop_map(Op::StartTimer),
        prop::sample::select(vec![15u32, 30, 60]).prop_map(Op::ToggleTimer),
        (0u64..4000).prop_map(Op::Advance),
    ]
}

fn nonzero_mix() -> impl Strategy<Value = [f32; 4]> {
    prop::array::uniform4(0.0f32..=1.0).prop_filter("mix must be audible", |mix| {
        mix.iter().any(|v| *v > 0.0)
    })
}

// ===== Property Tests =====

proptest! {
    /// Property: set then get returns the value for every in-range volume
    #[test]
    fn set_then_get_roundtrips(track in 0usize..4, volume in 0.0f32..=1.0) {
        let mut store = TrackVolumeStore::new(&TrackCatalog::ambient(), 0.0);
        store.set_volume(TRACKS[track], volume).unwrap();
        prop_assert_eq!(store.get_volume(TRACKS[track]).unwrap(), volume);
    }

    /// Property: stored volumes never leave [0, 1]
    #[test]
    fn volumes_are_always_clamped(track in 0usize..4, volume in -100.0f32..100.0) {
        let mut store = TrackVolumeStore::new(&TrackCatalog::ambient(), 0.0);
        store.set_volume(TRACKS[track], volume).unwrap();
        let stored = store.get_volume(TRACKS[track]).unwrap();
        prop_assert!((0.0..=1.0).contains(&stored));
    }

    /// Property: mute-all silences every known track regardless of prior state
    #[test]
    fn mute_all_silences_everything(mix in prop::array::uniform4(0.0f32..=1.0)) {
        let mut store = TrackVolumeStore::new(&TrackCatalog::ambient(), 0.0);
        for (track, volume) in TRACKS.iter().zip(mix) {
            store.set_volume(track, volume).unwrap();
        }

        store.mute_all();

        prop_assert_eq!(store.get_all().len(), TRACKS.len());
        prop_assert!(store.get_all().iter().all(|(_, v)| v == 0.0));
    }

    /// Property: master toggle twice restores any audible mix exactly
    #[test]
    fn master_toggle_roundtrip(mix in nonzero_mix()) {
        let (mut mixer, _) = mixer();
        for (track, volume) in TRACKS.iter().zip(mix) {
            mixer.set_track_volume(track, volume).unwrap();
        }
        let before = mixer.volumes().clone();

        prop_assert!(!mixer.toggle_master_play());
        prop_assert!(mixer.volumes().is_silent());
        prop_assert!(mixer.toggle_master_play());

        prop_assert_eq!(mixer.volumes(), &before);
    }

    /// Property: the aggregate flag matches the volume map after any operation,
    /// and every track keeps exactly one entry
    #[test]
    fn aggregate_flag_is_derived(ops in prop::collection::vec(arbitrary_op(), 1..60)) {
        let (mut mixer, clock) = mixer();

        for op in ops {
            match op {
                Op::SetVolume(track, volume) => {
                    mixer.set_track_volume(TRACKS[track], volume).unwrap();
                }
                Op::MuteAll => mixer.mute_all(),
                Op::ToggleMaster => {
                    mixer.toggle_master_play();
                }
                Op::StartTimer(secs) => mixer.start_timer(secs),
                Op::ToggleTimer(minutes) => mixer.toggle_timer_button(minutes),
                Op::Advance(ms) => {
                    clock.advance(Duration::from_millis(ms));
                    mixer.poll();
                }
            }

            let any_audible = mixer.volumes().iter().any(|(_, v)| v > 0.0);
            prop_assert_eq!(mixer.is_playing(), any_audible);
            prop_assert_eq!(mixer.volumes().len(), TRACKS.len());

            let timer = mixer.timer();
            prop_assert!(timer.remaining_secs <= timer.configured_secs);
            prop_assert_eq!(timer.running, mixer.next_tick_deadline().is_some());
        }
    }
}
