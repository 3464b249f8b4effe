#![allow(dead_code)]

use calmwave::nodes::RtrbSink;
use calmwave::{AudioEngine, EngineConfig, BLOCK_SIZE};
use rtrb::{Consumer, RingBuffer};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Plenty of room for a few blocks between drains
const RING_SIZE: usize = 8192;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A stereo engine rendering into a ring buffer the test drains itself
pub fn stereo_engine(sample_rate: u32) -> (AudioEngine, Consumer<f32>) {
    init_tracing();
    let (producer, consumer) = RingBuffer::new(RING_SIZE);
    let config = EngineConfig::default().with_sample_rate(sample_rate);
    let engine = AudioEngine::new(config)
        .expect("valid config")
        .with_output(RtrbSink::stereo(producer));
    (engine, consumer)
}

pub fn blocks_for(secs: f32, sample_rate: u32) -> usize {
    (secs * sample_rate as f32 / BLOCK_SIZE as f32).ceil() as usize
}

#[derive(Default)]
pub struct Rendered {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl Rendered {
    pub fn all_finite(&self) -> bool {
        self.left.iter().chain(&self.right).all(|s| s.is_finite())
    }

    pub fn rms(&self) -> f32 {
        rms(&self.left).max(rms(&self.right))
    }
}

/// Call `process` `blocks` times, collecting the interleaved output
pub fn render(consumer: &mut Consumer<f32>, blocks: usize, mut process: impl FnMut()) -> Rendered {
    let mut out = Rendered::default();
    for _ in 0..blocks {
        process();
        while let (Ok(l), Ok(r)) = (consumer.pop(), consumer.pop()) {
            out.left.push(l);
            out.right.push(r);
        }
    }
    out
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Frequency (Hz) of the strongest bin of a plain FFT over `samples`
pub fn peak_frequency(samples: &[f32], sample_rate: u32) -> f32 {
    let n = samples.len();
    let fft = FftPlanner::<f32>::new().plan_fft_forward(n);
    let mut buf: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buf);

    let (bin, _) = buf[1..n / 2]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
        .expect("non-empty spectrum");
    (bin + 1) as f32 * sample_rate as f32 / n as f32
}

/// Welch power spectral density: Hann-windowed segments, averaged.
/// Returns one power value per bin up to Nyquist.
pub fn welch_psd(samples: &[f32], segment: usize) -> Vec<f32> {
    let fft = FftPlanner::<f32>::new().plan_fft_forward(segment);
    let window: Vec<f32> = (0..segment)
        .map(|i| 0.5 - 0.5 * (std::f32::consts::TAU * i as f32 / segment as f32).cos())
        .collect();

    let mut psd = vec![0.0f32; segment / 2];
    let mut count = 0;
    for chunk in samples.chunks_exact(segment) {
        let mut buf: Vec<Complex<f32>> = chunk
            .iter()
            .zip(&window)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        fft.process(&mut buf);
        for (p, c) in psd.iter_mut().zip(&buf) {
            *p += c.norm_sqr();
        }
        count += 1;
    }
    psd.iter_mut().for_each(|p| *p /= count.max(1) as f32);
    psd
}

/// Mean power density (dB) between `lo` and `hi` Hz
pub fn band_db(psd: &[f32], segment: usize, sample_rate: u32, lo: f32, hi: f32) -> f32 {
    let hz_per_bin = sample_rate as f32 / segment as f32;
    let first = (lo / hz_per_bin).ceil() as usize;
    let last = ((hi / hz_per_bin).floor() as usize).min(psd.len() - 1);
    let bins = &psd[first..=last];
    let mean = bins.iter().sum::<f32>() / bins.len() as f32;
    10.0 * mean.log10()
}
