//! Ring buffer sink for custom audio processing

use dasp_graph::{Buffer, Input};
use rtrb::Producer;

use crate::node::{AudioNode, ProcessContext};

/// A sink that pushes interleaved audio into an rtrb ring buffer
///
/// Useful for:
/// - Feeding a device callback on another thread
/// - Offline rendering and analysis
///
/// Blocks that do not fit are skipped whole rather than partially written.
pub struct RtrbSink {
    producer: Producer<f32>,
    channels: usize,
    skipped_blocks: u64,
}

impl RtrbSink {
    /// Create a sink that writes interleaved samples to the given producer
    pub fn new(producer: Producer<f32>, channels: usize) -> Self {
        Self {
            producer,
            channels: channels.max(1),
            skipped_blocks: 0,
        }
    }

    /// Create a sink for mono audio
    pub fn mono(producer: Producer<f32>) -> Self {
        Self::new(producer, 1)
    }

    /// Create a sink for stereo audio
    pub fn stereo(producer: Producer<f32>) -> Self {
        Self::new(producer, 2)
    }

    /// Returns how many sample slots are available
    #[inline]
    pub fn available(&self) -> usize {
        self.producer.slots()
    }

    /// Blocks dropped because the consumer fell behind
    #[inline]
    pub fn skipped_blocks(&self) -> u64 {
        self.skipped_blocks
    }
}

impl AudioNode for RtrbSink {
    type Message = ();

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        // Sum everything wired into the sink
        let mut mix = [Buffer::default(), Buffer::default()];
        let mix = &mut mix[..self.channels.min(2)];
        crate::node::sum_inputs(inputs, mix);

        let buffer_len = mix[0].len();
        let samples_needed = buffer_len * self.channels;

        if self.producer.slots() < samples_needed {
            self.skipped_blocks += 1;
            return;
        }

        for i in 0..buffer_len {
            for ch in 0..self.channels {
                let src_ch = ch.min(mix.len() - 1);
                let _ = self.producer.push(mix[src_ch][i]);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }
}
