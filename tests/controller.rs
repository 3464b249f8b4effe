mod common;

use std::time::Duration;

use calmwave::{EngineError, PlaybackController, PlaybackState, PlaybackStatus, SoundId};
use common::{blocks_for, render, stereo_engine};
use rtrb::Consumer;

const RATE: u32 = 24_000;

fn controller() -> (PlaybackController, Consumer<f32>) {
    let (engine, consumer) = stereo_engine(RATE);
    (PlaybackController::new(engine), consumer)
}

#[test]
fn starts_idle() {
    let (player, _consumer) = controller();
    assert_eq!(player.state(), PlaybackState::Idle);
    assert_eq!(
        player.status(),
        PlaybackStatus { is_playing: false, current_sound: None, volume: 0.7 }
    );
}

#[test]
fn switching_sounds_releases_the_previous_one_once() {
    let (mut player, mut consumer) = controller();

    player.play(SoundId::Ocean).unwrap();
    let ocean = player.current_voice().unwrap();
    render(&mut consumer, 20, || player.process());

    player.play(SoundId::Rain).unwrap();
    let rain = player.current_voice().unwrap();

    let engine = player.engine();
    assert!(!engine.is_live(ocean));
    assert!(engine.is_live(rain));
    assert_eq!(engine.live_voices(), 1);
    assert_eq!(engine.stats().voices_released, 1);
    assert_eq!(engine.stats().peak_live_voices, 1);
}

#[test]
fn playing_the_current_sound_again_does_nothing() {
    let (mut player, _consumer) = controller();

    player.play(SoundId::Drone).unwrap();
    let voice = player.current_voice();
    player.play(SoundId::Drone).unwrap();
    player.play_named("drone").unwrap();

    assert_eq!(player.current_voice(), voice);
    assert_eq!(player.engine().stats().voices_spawned, 1);
}

#[test]
fn pause_then_play_rebuilds_from_scratch() {
    let (mut player, mut consumer) = controller();

    player.play(SoundId::Wind).unwrap();
    let first = player.current_voice().unwrap();
    let first_nodes = player.engine().voice_nodes(first).to_vec();
    render(&mut consumer, 20, || player.process());

    player.pause();
    assert_eq!(player.state(), PlaybackState::Paused { sound: SoundId::Wind });
    assert_eq!(player.status().current_sound, Some(SoundId::Wind));
    assert!(!player.status().is_playing);
    assert_eq!(player.engine().live_voices(), 0);

    // pausing twice is harmless
    player.pause();
    assert_eq!(player.engine().stats().voices_released, 1);

    player.play(SoundId::Wind).unwrap();
    let second = player.current_voice().unwrap();
    assert_ne!(first, second);

    let second_nodes = player.engine().voice_nodes(second);
    assert_eq!(second_nodes.len(), first_nodes.len());
    assert!(second_nodes.iter().all(|id| !first_nodes.contains(id)));
}

#[test]
fn resume_restarts_the_paused_sound() {
    let (mut player, _consumer) = controller();

    player.play(SoundId::Binaural).unwrap();
    player.pause();
    player.resume().unwrap();

    assert!(matches!(
        player.state(),
        PlaybackState::Playing { sound: SoundId::Binaural, .. }
    ));
}

#[test]
fn volume_changes_leave_the_voice_alone() {
    let (mut player, mut consumer) = controller();

    player.play(SoundId::Ocean).unwrap();
    let voice = player.current_voice();

    player.set_volume(0.3).unwrap();
    assert_eq!(player.status().volume, 0.3);
    player.set_volume(1.7).unwrap();
    assert_eq!(player.status().volume, 1.0);
    player.set_volume(-2.0).unwrap();
    assert_eq!(player.status().volume, 0.0);

    assert!(matches!(
        player.set_volume(f32::NAN),
        Err(EngineError::InvalidParameter { name: "volume", .. })
    ));
    assert!(player.set_volume(f32::INFINITY).is_err());
    assert_eq!(player.status().volume, 0.0);

    render(&mut consumer, 10, || player.process());

    assert_eq!(player.current_voice(), voice);
    assert_eq!(player.engine().master_level(), 0.0);
    let stats = player.engine().stats();
    assert_eq!(stats.voices_spawned, 1);
    assert_eq!(stats.voices_released, 0);
}

#[test]
fn slider_drag_without_rendering_lands_on_the_last_volume() {
    let (mut dragged, mut dragged_out) = controller();
    dragged.play(SoundId::Binaural).unwrap();

    // more changes than the master queue can hold
    for i in 0..100 {
        dragged.set_volume(i as f32 / 100.0).unwrap();
    }
    assert_eq!(dragged.status().volume, 0.99);
    assert_eq!(dragged.engine().master_level(), 0.99);
    assert!(dragged.engine().master_level_pending());

    let (mut direct, mut direct_out) = controller();
    direct.play(SoundId::Binaural).unwrap();
    direct.set_volume(0.99).unwrap();

    let blocks = blocks_for(0.5, RATE);
    let dragged_render = render(&mut dragged_out, blocks, || dragged.process());
    let direct_render = render(&mut direct_out, blocks, || direct.process());
    assert!(!dragged.engine().master_level_pending());

    let settled = |r: &common::Rendered| common::rms(&r.left[r.left.len() / 2..]);
    let (got, want) = (settled(&dragged_render), settled(&direct_render));
    assert!(want > 0.1);
    assert!((got - want).abs() < want * 0.01, "rendered rms {got}, expected {want}");
}

#[test]
fn unknown_names_are_rejected_before_anything_runs() {
    let (mut player, _consumer) = controller();

    assert_eq!(
        player.play_named("thunder"),
        Err(EngineError::UnknownSound("thunder".into()))
    );
    assert_eq!(player.state(), PlaybackState::Idle);
    assert_eq!(player.engine().stats().voices_spawned, 0);
}

#[test]
fn sleep_timer_pauses_when_it_runs_out() {
    let (mut player, _consumer) = controller();

    player.play(SoundId::Ocean).unwrap();
    player.start_timer(10).unwrap();
    assert_eq!(player.remaining_seconds(), 600);

    assert!(!player.tick(Duration::from_secs(9 * 60)));
    assert_eq!(player.remaining_seconds(), 60);
    assert!(player.status().is_playing);

    assert!(player.tick(Duration::from_secs(2 * 60)));
    assert_eq!(player.state(), PlaybackState::Paused { sound: SoundId::Ocean });
    assert_eq!(player.remaining_seconds(), 0);
    assert!(player.sleep_timer().is_none());
    assert_eq!(player.engine().live_voices(), 0);

    // nothing left to cancel or expire
    player.cancel_timer();
    assert!(!player.tick(Duration::from_secs(60)));
    assert_eq!(player.state(), PlaybackState::Paused { sound: SoundId::Ocean });
}

#[test]
fn sleep_timer_validation_and_cancel() {
    let (mut player, _consumer) = controller();

    assert!(matches!(
        player.start_timer(0),
        Err(EngineError::InvalidParameter { name: "sleep_timer_minutes", .. })
    ));
    assert!(player.sleep_timer().is_none());

    player.start_timer(5).unwrap();
    player.cancel_timer();
    assert_eq!(player.remaining_seconds(), 0);
    assert!(!player.tick(Duration::from_secs(600)));
}

#[test]
fn stop_clears_selection_and_timer() {
    let (mut player, _consumer) = controller();

    player.play(SoundId::Rain).unwrap();
    player.start_timer(30).unwrap();
    player.stop();

    assert_eq!(player.state(), PlaybackState::Idle);
    assert_eq!(player.status().current_sound, None);
    assert_eq!(player.remaining_seconds(), 0);
    assert_eq!(player.engine().live_voices(), 0);
}

#[test]
fn ocean_rain_pause_rain() {
    let (mut player, mut consumer) = controller();
    let half_second = blocks_for(0.5, RATE);

    player.play(SoundId::Ocean).unwrap();
    let ocean = render(&mut consumer, half_second, || player.process());
    assert!(ocean.rms() > 0.01);

    player.play(SoundId::Rain).unwrap();
    let rain = render(&mut consumer, half_second, || player.process());
    assert!(rain.rms() > 0.01);

    player.pause();
    let paused = render(&mut consumer, half_second, || player.process());
    assert_eq!(paused.rms(), 0.0);

    player.play(SoundId::Rain).unwrap();
    let again = render(&mut consumer, half_second, || player.process());
    assert!(again.rms() > 0.01);
    assert!(again.all_finite());

    assert_eq!(
        player.status(),
        PlaybackStatus { is_playing: true, current_sound: Some(SoundId::Rain), volume: 0.7 }
    );
    let stats = player.engine().stats();
    assert_eq!(stats.voices_spawned, 3);
    assert_eq!(stats.voices_released, 2);
    assert_eq!(stats.peak_live_voices, 1);
}
