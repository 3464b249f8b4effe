//! CPAL audio output sink

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::Thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, SupportedStreamConfig};
use dasp_graph::{Buffer, Input};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::node::{sum_inputs, AudioNode, ProcessContext};

/// Counters shared with the stream callback
#[derive(Clone, Default)]
struct Meters {
    samples_consumed: Arc<AtomicUsize>,
    had_underrun: Arc<AtomicBool>,
    /// Set when the sink is dropped; the stream thread then shuts down
    closed: Arc<AtomicBool>,
}

/// Feeds the master bus to a CPAL device.
///
/// The stream runs on its own thread and drains a ring buffer this node fills
/// once per block. A block that does not fit is dropped whole. Dropping the
/// sink stops the stream and ends its thread.
pub struct CpalSink {
    buffer: Producer<f32>,
    channels: usize,
    meters: Meters,
    stream_thread: Thread,
}

impl CpalSink {
    /// Create a new sink for the given device and config
    pub fn new(device: &cpal::Device, config: &SupportedStreamConfig) -> Self {
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config = config.config();
        let sample_rate = stream_config.sample_rate.0;

        // ~100ms of audio
        let buffer_samples = ((sample_rate as f32 * 0.1) as usize) * channels;
        let buffer_size = buffer_samples.next_power_of_two().max(8192);
        let (producer, consumer) = RingBuffer::<f32>::new(buffer_size);

        let meters = Meters::default();
        let stream_meters = meters.clone();

        // The stream is not Send on every platform, so it lives on its own thread
        let device = device.clone();
        let closed = meters.closed.clone();
        let thread = std::thread::spawn(move || {
            let stream = match build_stream(&device, sample_format, &stream_config, consumer, stream_meters) {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::error!(%err, "failed to build output stream");
                    return;
                }
            };

            if let Err(err) = stream.play() {
                tracing::error!(%err, "failed to start output stream");
                return;
            }
            tracing::debug!(sample_rate, channels, "output stream started");

            wait_until_closed(&closed);
            drop(stream);
            tracing::debug!("output stream closed");
        });

        Self {
            buffer: producer,
            channels,
            meters,
            stream_thread: thread.thread().clone(),
        }
    }

    /// Returns how many samples have been played
    #[inline]
    pub fn samples_consumed(&self) -> usize {
        self.meters.samples_consumed.load(Ordering::Relaxed)
    }

    /// Returns available space in the buffer (in samples)
    #[inline]
    pub fn buffer_available(&self) -> usize {
        self.buffer.slots()
    }

    /// Check and clear the underrun flag
    pub fn check_underrun(&self) -> bool {
        self.meters.had_underrun.swap(false, Ordering::Relaxed)
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        self.meters.closed.store(true, Ordering::Release);
        self.stream_thread.unpark();
    }
}

/// Park until `closed` is set. Wakes periodically in case an unpark is missed.
fn wait_until_closed(closed: &AtomicBool) {
    while !closed.load(Ordering::Acquire) {
        std::thread::park_timeout(Duration::from_millis(250));
    }
}

fn build_stream(
    device: &cpal::Device,
    sample_format: SampleFormat,
    stream_config: &cpal::StreamConfig,
    consumer: Consumer<f32>,
    meters: Meters,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    match sample_format {
        SampleFormat::F32 => build_typed::<f32>(device, stream_config, consumer, meters),
        SampleFormat::F64 => build_typed::<f64>(device, stream_config, consumer, meters),
        SampleFormat::I16 => build_typed::<i16>(device, stream_config, consumer, meters),
        SampleFormat::I32 => build_typed::<i32>(device, stream_config, consumer, meters),
        SampleFormat::U16 => build_typed::<u16>(device, stream_config, consumer, meters),
        SampleFormat::U8 => build_typed::<u8>(device, stream_config, consumer, meters),
        other => {
            tracing::warn!(?other, "unsupported output sample format");
            Err(cpal::BuildStreamError::StreamConfigNotSupported)
        }
    }
}

fn build_typed<T>(
    device: &cpal::Device,
    stream_config: &cpal::StreamConfig,
    mut consumer: Consumer<f32>,
    meters: Meters,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        stream_config,
        move |data: &mut [T], _| {
            let mut underrun = false;
            for sample in data.iter_mut() {
                let s = consumer.pop().unwrap_or_else(|_| {
                    underrun = true;
                    0.0
                });
                *sample = T::from_sample(s.clamp(-1.0, 1.0));
            }
            if underrun {
                meters.had_underrun.store(true, Ordering::Relaxed);
            }
            meters.samples_consumed.fetch_add(data.len(), Ordering::Relaxed);
        },
        |err: cpal::StreamError| tracing::error!(%err, "output stream error"),
        None,
    )
}

impl AudioNode for CpalSink {
    type Message = ();

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        _outputs: &mut [Buffer],
    ) {
        let mut mix = [Buffer::default(), Buffer::default()];
        let mix = &mut mix[..self.channels.clamp(1, 2)];
        sum_inputs(inputs, mix);

        let buffer_len = mix[0].len();
        let samples_needed = buffer_len * self.channels;

        // Skip this block rather than partially write
        if self.buffer.slots() < samples_needed {
            return;
        }

        // Interleave; extra device channels repeat the last rendered one
        for i in 0..buffer_len {
            for ch in 0..self.channels {
                let src_ch = ch.min(mix.len() - 1);
                let _ = self.buffer.push(mix[src_ch][i]);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { 1 }

    #[inline]
    fn num_outputs(&self) -> usize { 0 }
}
