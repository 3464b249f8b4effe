//! Equal-power stereo panner

use dasp_graph::{Buffer, Input};

use crate::node::{sum_inputs, AudioNode, ProcessContext};

#[derive(Clone, Copy, Debug)]
pub enum PannerMessage {
    /// -1.0 = hard left, 0.0 = centre, 1.0 = hard right
    SetPan(f32),
}

/// Places a mono signal in the stereo field.
///
/// Inputs are summed to mono first; the output is always two channels.
pub struct Panner {
    pan: f32,
}

impl Panner {
    pub fn new(pan: f32) -> Self {
        Self { pan: pan.clamp(-1.0, 1.0) }
    }

    pub fn hard_left() -> Self {
        Self::new(-1.0)
    }

    pub fn hard_right() -> Self {
        Self::new(1.0)
    }

    #[inline]
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// (left, right) gains for the current position
    #[inline]
    pub fn gains(&self) -> (f32, f32) {
        let x = (self.pan + 1.0) * 0.5 * core::f32::consts::FRAC_PI_2;
        (x.cos(), x.sin())
    }
}

impl AudioNode for Panner {
    type Message = PannerMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = PannerMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                PannerMessage::SetPan(p) => self.pan = p.clamp(-1.0, 1.0),
            }
        }

        let Some((left, rest)) = outputs.split_first_mut() else {
            return;
        };

        sum_inputs(inputs, core::slice::from_mut(left));

        let (gain_l, gain_r) = self.gains();
        if let Some(right) = rest.first_mut() {
            for (r, l) in right.iter_mut().zip(left.iter()) {
                *r = *l * gain_r;
            }
        }
        left.iter_mut().for_each(|s| *s *= gain_l);
    }

    #[inline]
    fn num_inputs(&self) -> usize { usize::MAX }

    #[inline]
    fn num_outputs(&self) -> usize { 2 }
}
