//! Playback control: one sound at a time, master volume and a sleep timer.

use std::time::Duration;

use crate::engine::AudioEngine;
use crate::error::EngineError;
use crate::sounds::SoundId;
use crate::voice::{TeardownReport, VoiceId};

#[cfg(feature = "cpal_sink")]
use crate::config::EngineConfig;

/// Where the controller is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing { sound: SoundId, voice: VoiceId },
    /// The voice is gone but the selection is remembered
    Paused { sound: SoundId },
}

/// Snapshot for a UI
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub current_sound: Option<SoundId>,
    pub volume: f32,
}

/// Countdown to an automatic pause
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepTimer {
    remaining: Duration,
}

impl SleepTimer {
    pub fn new(duration: Duration) -> Self {
        Self { remaining: duration }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Count down by `elapsed`. Returns `true` once the timer has run out.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining.is_zero()
    }
}

/// Owns the engine and makes sure at most one sound is ever live.
///
/// ```
/// use calmwave::{AudioEngine, EngineConfig, PlaybackController, SoundId};
/// use calmwave::nodes::RtrbSink;
///
/// let (producer, _consumer) = rtrb::RingBuffer::new(8192);
/// let engine = AudioEngine::new(EngineConfig::default())?.with_output(RtrbSink::stereo(producer));
/// let mut player = PlaybackController::new(engine);
///
/// player.play(SoundId::Wind)?;
/// player.play_named("rain")?;
/// assert_eq!(player.status().current_sound, Some(SoundId::Rain));
/// assert_eq!(player.engine().live_voices(), 1);
///
/// player.pause();
/// assert!(!player.status().is_playing);
/// # Ok::<(), calmwave::EngineError>(())
/// ```
pub struct PlaybackController {
    engine: AudioEngine,
    state: PlaybackState,
    volume: f32,
    sleep_timer: Option<SleepTimer>,
}

impl PlaybackController {
    pub fn new(engine: AudioEngine) -> Self {
        Self {
            volume: engine.master_level(),
            engine,
            state: PlaybackState::Idle,
            sleep_timer: None,
        }
    }

    /// Controller for an engine on the system's default output device
    #[cfg(feature = "cpal_sink")]
    pub fn default_output(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self::new(AudioEngine::default_output(config)?))
    }

    /// Start `sound`, stopping whatever else is playing.
    ///
    /// Selecting the sound that is already playing does nothing. A paused
    /// sound is rebuilt from scratch. If the new sound cannot be built the
    /// controller ends up idle.
    pub fn play(&mut self, sound: SoundId) -> Result<(), EngineError> {
        if let PlaybackState::Playing { sound: current, .. } = self.state {
            if current == sound {
                return Ok(());
            }
        }

        self.release_current();

        match self.engine.spawn(sound.generator()) {
            Ok(voice) => {
                tracing::info!(%sound, ?voice, "playing");
                self.state = PlaybackState::Playing { sound, voice };
                Ok(())
            }
            Err(err) => {
                tracing::error!(%sound, %err, "could not start sound");
                self.state = PlaybackState::Idle;
                Err(err)
            }
        }
    }

    /// [`play`](Self::play) by catalog id, e.g. `"ocean"`
    pub fn play_named(&mut self, id: &str) -> Result<(), EngineError> {
        let sound = id.parse::<SoundId>()?;
        self.play(sound)
    }

    /// Stop the sound but keep it selected
    pub fn pause(&mut self) {
        if let PlaybackState::Playing { sound, .. } = self.state {
            self.release_current();
            self.state = PlaybackState::Paused { sound };
            tracing::info!(%sound, "paused");
        }
    }

    /// Rebuild the paused sound. Does nothing unless paused.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        match self.state {
            PlaybackState::Paused { sound } => self.play(sound),
            _ => Ok(()),
        }
    }

    /// Stop everything and forget the selection and sleep timer
    pub fn stop(&mut self) {
        self.release_current();
        self.state = PlaybackState::Idle;
        self.sleep_timer = None;
        tracing::info!("stopped");
    }

    /// Set the master volume, clamped to 0.0..=1.0.
    ///
    /// Only the master bus changes; the playing sound is left alone.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        if !volume.is_finite() {
            return Err(EngineError::InvalidParameter {
                name: "volume",
                value: volume as f64,
            });
        }

        let volume = volume.clamp(0.0, 1.0);
        self.engine.set_master_level(volume);
        self.volume = volume;
        if self.engine.master_level_pending() {
            tracing::debug!(volume, "master queue full, volume applies on the next block");
        }
        Ok(())
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Pause automatically after `minutes`. Replaces any running timer.
    pub fn start_timer(&mut self, minutes: u32) -> Result<(), EngineError> {
        if minutes == 0 {
            return Err(EngineError::InvalidParameter {
                name: "sleep_timer_minutes",
                value: 0.0,
            });
        }
        self.sleep_timer = Some(SleepTimer::new(Duration::from_secs(minutes as u64 * 60)));
        tracing::debug!(minutes, "sleep timer started");
        Ok(())
    }

    pub fn cancel_timer(&mut self) {
        if self.sleep_timer.take().is_some() {
            tracing::debug!("sleep timer cancelled");
        }
    }

    /// Whole seconds left on the sleep timer, rounded up. 0 without a timer.
    pub fn remaining_seconds(&self) -> u64 {
        self.sleep_timer.map_or(0, |t| {
            let remaining = t.remaining();
            remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
        })
    }

    pub fn sleep_timer(&self) -> Option<SleepTimer> {
        self.sleep_timer
    }

    /// Advance the sleep timer by wall-clock time. Pauses when it runs out.
    ///
    /// Returns `true` if the timer expired during this tick.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Some(timer) = self.sleep_timer.as_mut() else {
            return false;
        };
        if !timer.advance(elapsed) {
            return false;
        }

        tracing::info!("sleep timer expired");
        self.sleep_timer = None;
        self.pause();
        true
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        let (is_playing, current_sound) = match self.state {
            PlaybackState::Idle => (false, None),
            PlaybackState::Playing { sound, .. } => (true, Some(sound)),
            PlaybackState::Paused { sound } => (false, Some(sound)),
        };
        PlaybackStatus {
            is_playing,
            current_sound,
            volume: self.volume,
        }
    }

    /// Voice of the playing sound
    pub fn current_voice(&self) -> Option<VoiceId> {
        match self.state {
            PlaybackState::Playing { voice, .. } => Some(voice),
            _ => None,
        }
    }

    /// Render one block
    #[inline]
    pub fn process(&mut self) {
        self.engine.process();
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    fn release_current(&mut self) -> Option<TeardownReport> {
        let voice = self.current_voice()?;
        let report = self.engine.release(voice);
        if report.missing > 0 {
            tracing::debug!(?voice, missing = report.missing, "some nodes were already gone");
        }
        Some(report)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.release_current();
    }
}
