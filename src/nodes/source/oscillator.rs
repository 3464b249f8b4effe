//! Periodic oscillator with optional detune and pitch vibrato

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};
use crate::param::{cents_to_ratio, Lfo, Waveform};

/// Messages to control an [`Oscillator`]
#[derive(Clone, Copy, Debug)]
pub enum OscillatorMessage {
    SetFrequency(f32),
    SetAmplitude(f32),
    /// Static pitch offset in cents
    SetDetune(f32),
}

/// A mono oscillator source.
///
/// Pitch is `frequency * 2^((detune + vibrato) / 1200)`, where the vibrato
/// LFO's depth is expressed in cents.
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    detune_cents: f32,
    vibrato: Option<Lfo>,
    amplitude: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency: frequency.max(0.0),
            detune_cents: 0.0,
            vibrato: None,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(Waveform::Sine, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(Waveform::Triangle, frequency)
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude.clamp(0.0, 1.0);
        self
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    /// Wobble the pitch by `±depth_cents` at `rate` Hz
    pub fn with_vibrato(mut self, rate: f32, depth_cents: f32) -> Self {
        self.vibrato = Some(Lfo::sine(rate, depth_cents));
        self
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Frequency actually played, ignoring vibrato
    #[inline]
    pub fn detuned_frequency(&self) -> f32 {
        self.frequency * cents_to_ratio(self.detune_cents)
    }
}

impl AudioNode for Oscillator {
    type Message = OscillatorMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = OscillatorMessage>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                OscillatorMessage::SetFrequency(f) => self.frequency = f.max(0.0),
                OscillatorMessage::SetAmplitude(a) => self.amplitude = a.clamp(0.0, 1.0),
                OscillatorMessage::SetDetune(c) => self.detune_cents = c,
            }
        }

        let Some((first, rest)) = outputs.split_first_mut() else {
            return;
        };

        let rate = ctx.sample_rate as f32;
        let base_inc = self.detuned_frequency() / rate;
        let amplitude = self.amplitude;
        let waveform = self.waveform;

        for sample in first.iter_mut() {
            *sample = waveform.at(self.phase) * amplitude;

            let inc = match self.vibrato.as_mut() {
                Some(lfo) => base_inc * cents_to_ratio(lfo.tick(ctx.sample_rate)),
                None => base_inc,
            };
            self.phase += inc;
            self.phase -= self.phase.floor();
        }

        for buffer in rest.iter_mut() {
            buffer.copy_from_slice(first);
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 0 }

    #[inline]
    fn num_outputs(&self) -> usize { 1 }
}
