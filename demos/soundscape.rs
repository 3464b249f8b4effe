//! Cycle through every soundscape on the default output device.
//!
//! Each sound plays for `SECS_PER_SOUND` seconds; the volume dips halfway
//! through and a one-minute sleep timer ends the session.
//!
//! Run with: cargo run --example soundscape --features cpal_sink

use std::thread::sleep;
use std::time::{Duration, Instant};

use calmwave::sounds::catalog;
use calmwave::{EngineConfig, EngineError, PlaybackController};

const SECS_PER_SOUND: f32 = 8.0;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut player = PlaybackController::default_output(EngineConfig::default())?;
    let rate = player.engine().sample_rate() as f64;
    println!("Rendering at {} Hz", rate);

    player.start_timer(1)?;

    let start = Instant::now();
    let mut last_tick = start;
    let mut blocks = 0u64;
    let mut current = usize::MAX;

    while player.remaining_seconds() > 0 {
        let elapsed = start.elapsed().as_secs_f32();

        let index = (elapsed / SECS_PER_SOUND) as usize % catalog().len();
        if index != current {
            let sound = &catalog()[index];
            match sound.hint {
                Some(hint) => println!("{} - {} ({:?} recommended)", sound.name, sound.description, hint),
                None => println!("{} - {}", sound.name, sound.description),
            }
            player.play(sound.id)?;
            current = index;
        }

        let within = (elapsed % SECS_PER_SOUND) / SECS_PER_SOUND;
        let volume = if within < 0.5 { 0.7 } else { 0.4 };
        if player.volume() != volume {
            player.set_volume(volume)?;
        }

        // Process audio blocks to stay ahead of playback
        let target = (start.elapsed().as_secs_f64() * rate / 64.0) as u64 + 4;
        while blocks < target {
            player.process();
            blocks += 1;
        }

        let now = Instant::now();
        player.tick(now - last_tick);
        last_tick = now;

        sleep(Duration::from_millis(10));
    }

    println!("Sleep timer finished: {:?}", player.status());
    player.stop();
    Ok(())
}
