//! Built-in audio nodes.
//!
//! Nodes are organized into three categories:
//!
//! ## Sources ([`source`])
//!
//! Generate audio with no audio inputs:
//! - [`Oscillator`] - Sine/triangle/square/saw with detune and vibrato
//! - [`BufferSource`] - Loop a generated noise buffer
//!
//! ## Effects ([`effect`])
//!
//! Process audio (inputs → outputs). Every effect sums all of its inputs first:
//! - [`Gain`] - Volume control with smoothing and LFO modulation
//! - [`Filter`] - Biquad lowpass/highpass/bandpass/shelf
//! - [`Envelope`] - Exponential attack/decay for struck sounds
//! - [`Panner`] - Equal-power stereo placement
//! - [`Mixer`] - Plain sum
//!
//! ## Sinks ([`sink`])
//!
//! Consume audio with no audio outputs:
//! - [`CpalSink`] - Output to system audio device (requires `cpal_sink` feature)
//! - [`RtrbSink`] - Write interleaved samples to a ring buffer
//!
//! Nodes without parameters (like [`Mixer`]) use `()` as their message type.

pub mod source;
pub mod effect;
pub mod sink;

// Re-export common types at the top level for convenience
pub use source::{BufferSource, BufferSourceMessage, Oscillator, OscillatorMessage};
pub use effect::{
    Envelope, Filter, FilterKind, FilterMessage, Gain, GainMessage, Mixer, Panner,
    PannerMessage, ENVELOPE_FLOOR,
};
pub use sink::RtrbSink;

#[cfg(feature = "cpal_sink")]
pub use sink::CpalSink;
