//! Gain/volume control effect with LFO modulation

use dasp_graph::{Buffer, Input};

use crate::node::{sum_inputs, AudioNode, ProcessContext};
use crate::param::{Lfo, Param};

/// Messages to control gain
#[derive(Clone, Copy, Debug)]
pub enum GainMessage {
    /// Set the base gain multiplier (1.0 = unity, 0.0 = silence)
    SetGain(f32),
}

/// A gain stage that sums its inputs and scales them.
///
/// The applied gain is `smoothed(base) + Σ lfo`, so a slow LFO makes the
/// level swell around the base value. Changes to the base are smoothed to
/// prevent clicks; LFO motion is not.
pub struct Gain {
    gain: Param,
    /// Smoothed base gain
    smoothed_gain: f32,
    /// Smoothing coefficient (0.0 = instant, 1.0 = no change)
    smooth_coeff: f32,
    channels: usize,
}

impl Gain {
    /// Create a new stereo gain node with the specified gain value
    pub fn new(gain: f32) -> Self {
        Self {
            gain: Param::new(gain),
            smoothed_gain: gain,
            smooth_coeff: 0.995, // ~4ms at 48kHz
            channels: 2,
        }
    }

    /// Set the smoothing time in milliseconds
    pub fn with_smoothing_ms(mut self, ms: f32, sample_rate: u32) -> Self {
        // Time constant: after `ms` milliseconds, we've reached ~63% of target
        let samples = (ms / 1000.0) * sample_rate as f32;
        self.smooth_coeff = if samples > 0.0 { (-1.0 / samples).exp() } else { 0.0 };
        self
    }

    /// Disable smoothing for instant gain changes
    pub fn without_smoothing(mut self) -> Self {
        self.smooth_coeff = 0.0;
        self
    }

    /// Add an LFO on top of the base gain
    pub fn with_lfo(mut self, lfo: Lfo) -> Self {
        self.gain = self.gain.with_lfo(lfo);
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.clamp(1, 2);
        self
    }

    #[inline]
    pub fn gain(&self) -> f32 {
        self.gain.base()
    }

    pub fn lfos(&self) -> &[Lfo] {
        self.gain.lfos()
    }
}

impl AudioNode for Gain {
    type Message = GainMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = GainMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                GainMessage::SetGain(g) => self.gain.set_base(g),
            }
        }

        if outputs.is_empty() {
            return;
        }

        sum_inputs(inputs, outputs);

        let smooth_coeff = self.smooth_coeff;
        let target = self.gain.base();
        let mut smoothed = self.smoothed_gain;
        let len = outputs[0].len();

        for i in 0..len {
            smoothed = target + smooth_coeff * (smoothed - target);
            let gain = if self.gain.is_modulated() {
                (smoothed + self.gain.tick(ctx.sample_rate) - target).max(0.0)
            } else {
                smoothed
            };
            for buffer in outputs.iter_mut() {
                buffer[i] *= gain;
            }
        }

        self.smoothed_gain = smoothed;
    }

    #[inline]
    fn num_inputs(&self) -> usize { usize::MAX }

    #[inline]
    fn num_outputs(&self) -> usize { self.channels }
}
