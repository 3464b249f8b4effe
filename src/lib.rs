//! calmwave - procedural relaxation soundscapes on a message-passing audio graph
//!
//! Design principles:
//! - Every sound is synthesized: noise loops, oscillators and filters, no samples
//! - One engine owns the graph; nodes receive parameters via message ring buffers
//! - Everything a sound builds belongs to its voice and is torn down with it
//! - At most one sound plays at a time, enforced by [`PlaybackController`]
//! - CPAL devices are discoverable, sinks are just nodes
//!
//! ```
//! use calmwave::{AudioEngine, EngineConfig, PlaybackController, SoundId};
//! use calmwave::nodes::RtrbSink;
//!
//! let (producer, mut consumer) = rtrb::RingBuffer::new(8192);
//! let engine = AudioEngine::new(EngineConfig::default())?.with_output(RtrbSink::stereo(producer));
//! let mut player = PlaybackController::new(engine);
//!
//! player.play(SoundId::Ocean)?;
//! player.set_volume(0.4)?;
//! for _ in 0..32 {
//!     player.process();
//!     while consumer.pop().is_ok() {}
//! }
//! player.stop();
//! # Ok::<(), calmwave::EngineError>(())
//! ```

mod node;
mod graph;
mod engine;
mod voice;
mod config;
mod error;
mod controller;
#[cfg(feature = "cpal_sink")]
mod device;

pub mod param;
pub mod noise;
pub mod nodes;
pub mod sounds;

pub use node::{AudioNode, ProcessContext, NodeId, BLOCK_SIZE};
pub use engine::{AudioEngine, Handle, EngineStats};
pub use voice::{VoiceBuilder, VoiceId, TeardownReport, NodeRef, TimerCallback};
pub use config::EngineConfig;
pub use error::EngineError;
pub use controller::{PlaybackController, PlaybackState, PlaybackStatus, SleepTimer};
pub use sounds::{SoundId, SoundDescriptor, HardwareHint};
#[cfg(feature = "cpal_sink")]
pub use device::CpalDevice;
