//! Core node trait and context types.

use dasp_graph::{Buffer, Input};

/// Samples per processing block. Fixed by `dasp_graph`.
pub const BLOCK_SIZE: usize = 64;

/// Information available during audio processing.
///
/// Passed to every [`AudioNode::process`] call.
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext {
    /// Sample rate of the graph in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of samples per buffer (always [`BLOCK_SIZE`])
    pub buffer_size: usize,
}

/// Unique identifier for a node within an engine.
///
/// Ids are never reused, so a freshly built graph always has ids that were
/// not seen before.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw numeric value, mostly useful in logs and tests.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// The core trait for audio processing nodes.
///
/// Nodes can be:
/// - **Sources**: generate audio (0 inputs, 1+ outputs) - oscillators, noise players
/// - **Effects**: process audio (1+ inputs, 1+ outputs) - gain, filters, panners
/// - **Sinks**: consume audio (1+ inputs, 0 outputs) - device outputs, ring buffers
///
/// # Message-Based Parameters
///
/// Instead of shared mutable state, nodes receive parameter updates via messages.
/// Define a message type and drain it at the start of `process()`:
///
/// ```
/// use calmwave::{AudioNode, ProcessContext};
/// use dasp_graph::{Buffer, Input};
///
/// enum HumMessage {
///     SetLevel(f32),
/// }
///
/// struct Hum {
///     level: f32,
///     phase: f32,
/// }
///
/// impl AudioNode for Hum {
///     type Message = HumMessage;
///
///     fn process(
///         &mut self,
///         ctx: &ProcessContext,
///         messages: impl Iterator<Item = HumMessage>,
///         _inputs: &[Input],
///         outputs: &mut [Buffer],
///     ) {
///         for msg in messages {
///             match msg {
///                 HumMessage::SetLevel(l) => self.level = l,
///             }
///         }
///
///         for sample in outputs[0].iter_mut() {
///             *sample = (self.phase * std::f32::consts::TAU).sin() * self.level;
///             self.phase = (self.phase + 60.0 / ctx.sample_rate as f32) % 1.0;
///         }
///     }
/// }
/// ```
///
/// Nodes without runtime parameters use `()` as their message type.
pub trait AudioNode: Send + 'static {
    /// Message type for parameter updates.
    type Message: Send + 'static;

    /// Process one block of audio.
    ///
    /// Called once per block. Implementations should:
    /// 1. Drain and handle all pending messages
    /// 2. Read from `inputs` (if any)
    /// 3. Write to `outputs`
    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    );

    /// Number of audio inputs (0 for sources).
    fn num_inputs(&self) -> usize { 0 }

    /// Number of audio output channels.
    fn num_outputs(&self) -> usize { 1 }
}

/// Mix every input into `outputs`, upmixing mono inputs to all channels.
///
/// Effects that accept several upstream connections call this first and
/// then work on `outputs` in place.
pub(crate) fn sum_inputs(inputs: &[Input], outputs: &mut [Buffer]) {
    for buf in outputs.iter_mut() {
        buf.iter_mut().for_each(|s| *s = 0.0);
    }

    for input in inputs {
        let buffers = input.buffers();
        if buffers.is_empty() {
            continue;
        }

        for (out_ch, out_buf) in outputs.iter_mut().enumerate() {
            let in_buf = &buffers[out_ch.min(buffers.len() - 1)];
            for (out_sample, in_sample) in out_buf.iter_mut().zip(in_buf.iter()) {
                *out_sample += *in_sample;
            }
        }
    }
}
