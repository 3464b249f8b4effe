//! Looping player for generated sample buffers

use std::sync::Arc;

use dasp_graph::{Buffer, Input};

use crate::node::{AudioNode, ProcessContext};
use crate::noise::NoiseBuffer;

/// Messages to control a [`BufferSource`]
#[derive(Clone, Copy, Debug)]
pub enum BufferSourceMessage {
    /// Start or resume playback
    Play,
    /// Pause playback (keeps position)
    Pause,
    /// Stop playback and rewind
    Stop,
    /// Set playback volume (0.0 - 2.0)
    SetVolume(f32),
    /// Enable or disable looping
    SetLooping(bool),
}

/// Plays a mono buffer, looping by default.
///
/// The buffer is shared, not copied, so several sources may loop the same
/// noise without extra memory.
pub struct BufferSource {
    samples: Arc<[f32]>,
    position: usize,
    playing: bool,
    volume: f32,
    looping: bool,
}

impl BufferSource {
    pub fn new(samples: Arc<[f32]>) -> Self {
        Self {
            samples,
            position: 0,
            playing: true,
            volume: 1.0,
            looping: true,
        }
    }

    /// Loop a noise buffer from the start
    pub fn looping(noise: &NoiseBuffer) -> Self {
        Self::new(noise.shared())
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 2.0);
        self
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl AudioNode for BufferSource {
    type Message = BufferSourceMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = BufferSourceMessage>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                BufferSourceMessage::Play => self.playing = true,
                BufferSourceMessage::Pause => self.playing = false,
                BufferSourceMessage::Stop => {
                    self.playing = false;
                    self.position = 0;
                }
                BufferSourceMessage::SetVolume(v) => self.volume = v.clamp(0.0, 2.0),
                BufferSourceMessage::SetLooping(l) => self.looping = l,
            }
        }

        let Some((first, rest)) = outputs.split_first_mut() else {
            return;
        };

        if !self.playing || self.samples.is_empty() {
            first.iter_mut().for_each(|s| *s = 0.0);
        } else {
            let total = self.samples.len();
            for sample in first.iter_mut() {
                if self.position >= total {
                    if self.looping {
                        self.position = 0;
                    } else {
                        self.playing = false;
                        *sample = 0.0;
                        continue;
                    }
                }
                *sample = self.samples[self.position] * self.volume;
                self.position += 1;
            }
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
