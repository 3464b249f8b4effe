mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use calmwave::nodes::{Gain, Oscillator};
use calmwave::{AudioEngine, EngineConfig, EngineError, TeardownReport, VoiceBuilder};
use common::{blocks_for, render, stereo_engine};

const RATE: u32 = 16_000;

fn tone(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let tone = v.add(Oscillator::sine(440.0));
    v.connect_to_master(&tone)
}

#[test]
fn spawn_needs_an_output() {
    let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
    assert_eq!(engine.spawn(tone), Err(EngineError::NoOutput));
    assert_eq!(engine.live_voices(), 0);
}

#[test]
fn failed_generator_leaves_nothing_behind() {
    let (mut engine, _consumer) = stereo_engine(RATE);
    let baseline = engine.node_count();

    let result = engine.spawn(|v| {
        let tone = v.add(Oscillator::sine(440.0));
        let gain = v.add(Gain::new(0.5));
        v.connect(&tone, &gain)?;
        Err(EngineError::Construction("no more room".into()))
    });

    assert!(matches!(result, Err(EngineError::Construction(_))));
    assert_eq!(engine.node_count(), baseline);
    assert_eq!(engine.live_voices(), 0);
    assert_eq!(engine.stats().voices_released, 1);
}

#[test]
fn release_removes_every_node_once() {
    let (mut engine, mut consumer) = stereo_engine(RATE);
    let baseline = engine.node_count();

    let voice = engine
        .spawn(|v| {
            let tone = v.add(Oscillator::sine(440.0));
            let gain = v.add(Gain::new(0.5));
            v.connect(&tone, &gain)?;
            v.connect_to_master(&gain)
        })
        .unwrap();
    assert_eq!(engine.node_count(), baseline + 2);

    let out = render(&mut consumer, 10, || engine.process());
    assert!(out.rms() > 0.1);

    let report = engine.release(voice);
    assert_eq!(report, TeardownReport { removed: 2, missing: 0, timers_cancelled: 0 });
    assert_eq!(engine.node_count(), baseline);
    assert!(!engine.is_live(voice));

    // second release is a no-op
    assert_eq!(engine.release(voice), TeardownReport::default());
    assert_eq!(engine.stats().voices_released, 1);

    let out = render(&mut consumer, 10, || engine.process());
    assert_eq!(out.rms(), 0.0);
}

#[test]
fn nodes_removed_elsewhere_are_counted_not_fatal() {
    let (mut engine, _consumer) = stereo_engine(RATE);

    let voice = engine
        .spawn(|v| {
            let a = v.add(Oscillator::sine(220.0));
            let b = v.add(Oscillator::sine(330.0));
            v.connect_to_master(&a)?;
            v.connect_to_master(&b)
        })
        .unwrap();

    let first = engine.voice_nodes(voice)[0];
    assert!(engine.remove(&first));

    let report = engine.release(voice);
    assert_eq!(report.removed, 1);
    assert_eq!(report.missing, 1);
}

#[test]
fn master_and_sink_cannot_be_removed() {
    let (mut engine, _consumer) = stereo_engine(RATE);
    let master = engine.master_id();
    assert!(!engine.remove(&master));
    assert!(engine.contains(master));
}

#[test]
fn scheduled_removal_reaps_nodes() {
    let (mut engine, mut consumer) = stereo_engine(RATE);

    let voice = engine
        .spawn(|v| {
            let bus = v.add(Gain::new(1.0));
            let blip = v.add(Oscillator::sine(440.0));
            v.connect(&blip, &bus)?;
            v.connect_to_master(&bus)?;
            v.remove_after(vec![blip.id()], 0.5);
            Ok(())
        })
        .unwrap();
    assert_eq!(engine.voice_nodes(voice).len(), 2);
    assert_eq!(engine.voice_timers(voice), 1);

    render(&mut consumer, blocks_for(0.6, RATE), || engine.process());

    assert_eq!(engine.voice_nodes(voice).len(), 1);
    assert_eq!(engine.voice_timers(voice), 0);
    assert_eq!(engine.stats().timers_fired, 1);

    let report = engine.release(voice);
    assert_eq!(report, TeardownReport { removed: 1, missing: 0, timers_cancelled: 0 });
}

#[test]
fn repeating_timer_stops_with_its_voice() {
    let (mut engine, mut consumer) = stereo_engine(RATE);
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = fired.clone();
    let voice = engine
        .spawn(move |v| {
            let bus = v.add(Gain::new(1.0));
            v.connect_to_master(&bus)?;
            v.every(1.0, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            Ok(())
        })
        .unwrap();

    render(&mut consumer, blocks_for(3.5, RATE), || engine.process());
    assert_eq!(fired.load(Ordering::SeqCst), 3);

    let report = engine.release(voice);
    assert_eq!(report.timers_cancelled, 1);

    render(&mut consumer, blocks_for(3.0, RATE), || engine.process());
    assert_eq!(fired.load(Ordering::SeqCst), 3);
}

#[test]
fn failing_timer_is_not_rearmed() {
    let (mut engine, mut consumer) = stereo_engine(RATE);

    let voice = engine
        .spawn(|v| {
            v.every(0.25, |_| Err(EngineError::Construction("gone".into())));
            Ok(())
        })
        .unwrap();

    render(&mut consumer, blocks_for(1.0, RATE), || engine.process());
    assert_eq!(engine.stats().timers_fired, 1);
    assert_eq!(engine.voice_timers(voice), 0);
    assert!(engine.is_live(voice));
}

#[test]
fn node_ids_are_never_reused() {
    let (mut engine, _consumer) = stereo_engine(RATE);

    let first = engine.spawn(tone).unwrap();
    let first_nodes = engine.voice_nodes(first).to_vec();
    engine.release(first);

    let second = engine.spawn(tone).unwrap();
    assert_ne!(first, second);
    assert!(engine.voice_nodes(second).iter().all(|id| !first_nodes.contains(id)));
}
