//! One-shot attack/decay envelope

use dasp_graph::{Buffer, Input};

use crate::node::{sum_inputs, AudioNode, ProcessContext};

/// Level an exponential ramp starts from and decays to. Exponential curves
/// cannot reach zero.
pub const ENVELOPE_FLOOR: f32 = 0.0001;

/// Shapes its summed input with an exponential attack to `peak` followed by an
/// exponential decay back to [`ENVELOPE_FLOOR`]. Silent once the decay ends.
///
/// The envelope starts on its first processed block and runs once; a new
/// strike needs a new envelope.
pub struct Envelope {
    peak: f32,
    attack_secs: f32,
    decay_secs: f32,
    /// Samples since the first processed block
    elapsed: u64,
    channels: usize,
}

impl Envelope {
    pub fn new(peak: f32, attack_secs: f32, decay_secs: f32) -> Self {
        Self {
            peak: peak.max(ENVELOPE_FLOOR),
            attack_secs: attack_secs.max(0.0),
            decay_secs: decay_secs.max(0.0),
            elapsed: 0,
            channels: 1,
        }
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.clamp(1, 2);
        self
    }

    /// Attack plus decay
    #[inline]
    pub fn duration_secs(&self) -> f32 {
        self.attack_secs + self.decay_secs
    }

    /// Envelope level `t` seconds after the start
    pub fn level_at(&self, t: f32) -> f32 {
        if t < self.attack_secs {
            ramp(ENVELOPE_FLOOR, self.peak, t / self.attack_secs)
        } else if t < self.duration_secs() {
            ramp(self.peak, ENVELOPE_FLOOR, (t - self.attack_secs) / self.decay_secs)
        } else {
            0.0
        }
    }
}

/// Exponential interpolation from `from` to `to`, `progress` in 0.0..=1.0
#[inline]
fn ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress)
}

impl AudioNode for Envelope {
    type Message = ();

    fn process(
        &mut self,
        ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        if outputs.is_empty() {
            return;
        }

        sum_inputs(inputs, outputs);

        let rate = ctx.sample_rate as f32;
        let len = outputs[0].len();
        for i in 0..len {
            let level = self.level_at((self.elapsed + i as u64) as f32 / rate);
            for buffer in outputs.iter_mut() {
                buffer[i] *= level;
            }
        }
        self.elapsed += len as u64;
    }

    #[inline]
    fn num_inputs(&self) -> usize { usize::MAX }

    #[inline]
    fn num_outputs(&self) -> usize { self.channels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_peaks_then_decays_to_floor() {
        let env = Envelope::new(1.0, 0.05, 2.0);
        assert!((env.level_at(0.0) - ENVELOPE_FLOOR).abs() < 1e-6);
        assert!((env.level_at(0.05) - 1.0).abs() < 1e-4);
        assert!(env.level_at(1.0) < 1.0);
        assert!(env.level_at(1.0) > env.level_at(1.5));
        assert!(env.level_at(2.049) < 0.001);
        assert_eq!(env.level_at(2.1), 0.0);
    }
}
