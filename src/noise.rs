//! Noise buffer factory.
//!
//! Produces fixed-length mono buffers of white, brown or pink noise meant to be
//! looped by a [`BufferSource`](crate::nodes::BufferSource). Generation uses an
//! entropy-seeded `SmallRng`, so every buffer is statistically fresh; use
//! [`NoiseColor::generate_with`] with a seeded RNG when reproducibility matters.

use std::sync::Arc;

use hashbrown::HashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Integration constant of the brown-noise leaky integrator
const BROWN_LEAK: f32 = 0.02;
/// Make-up gain after integration
const BROWN_BOOST: f32 = 3.5;
/// Overall attenuation of the pink-noise pole sum
const PINK_SCALE: f32 = 0.11;

/// Noise colors, named after the slope of their power spectrum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseColor {
    /// Flat spectrum
    White,
    /// About -6 dB/octave
    Brown,
    /// About -3 dB/octave
    Pink,
}

impl NoiseColor {
    /// Generate a buffer with a fresh entropy-seeded RNG
    pub fn generate(self, duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
        self.generate_with(&mut SmallRng::from_entropy(), duration_secs, sample_rate)
    }

    /// Generate a buffer drawing white samples from `rng`
    pub fn generate_with<R: Rng>(self, rng: &mut R, duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
        let len = buffer_len(duration_secs, sample_rate);
        let mut white = core::iter::repeat_with(|| white_sample(&mut *rng));

        let samples: Vec<f32> = match self {
            NoiseColor::White => white.take(len).collect(),
            NoiseColor::Brown => {
                let mut last = 0.0f32;
                white
                    .by_ref()
                    .take(len)
                    .map(|w| {
                        last = (last + BROWN_LEAK * w) / (1.0 + BROWN_LEAK);
                        last * BROWN_BOOST
                    })
                    .collect()
            }
            NoiseColor::Pink => {
                let mut pink = PinkFilter::default();
                white.by_ref().take(len).map(|w| pink.next(w)).collect()
            }
        };

        NoiseBuffer {
            samples: samples.into(),
            sample_rate,
            color: self,
        }
    }
}

/// Convenience wrapper for [`NoiseColor::White`]
pub fn white_noise(duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
    NoiseColor::White.generate(duration_secs, sample_rate)
}

/// Convenience wrapper for [`NoiseColor::Brown`]
pub fn brown_noise(duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
    NoiseColor::Brown.generate(duration_secs, sample_rate)
}

/// Convenience wrapper for [`NoiseColor::Pink`]
pub fn pink_noise(duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
    NoiseColor::Pink.generate(duration_secs, sample_rate)
}

fn buffer_len(duration_secs: f32, sample_rate: u32) -> usize {
    (duration_secs.max(0.0) as f64 * sample_rate as f64).round() as usize
}

#[inline]
fn white_sample<R: Rng>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * 2.0 - 1.0
}

/// Paul Kellet's refined pink filter: seven weighted one-pole sections
/// fed by the same white sample.
#[derive(Default)]
struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    #[inline]
    fn next(&mut self, white: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;

        let pink = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + white * 0.5362;
        b[6] = white * 0.115926;

        pink * PINK_SCALE
    }
}

/// An immutable block of mono noise samples.
///
/// Cloning shares the samples.
#[derive(Clone, Debug)]
pub struct NoiseBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
    color: NoiseColor,
}

impl NoiseBuffer {
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub(crate) fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn color(&self) -> NoiseColor {
        self.color
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Root-mean-square level of the whole buffer
    pub fn rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let energy: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        (energy / self.samples.len() as f64).sqrt() as f32
    }

    /// Whether both buffers share the same allocation
    pub fn ptr_eq(&self, other: &NoiseBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}

/// Reuses generated buffers keyed by color, duration and sample rate.
#[derive(Default)]
pub struct NoiseCache {
    buffers: HashMap<(NoiseColor, u32, u32), NoiseBuffer>,
}

impl NoiseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached buffer, generating it on first use
    pub fn get_or_generate(&mut self, color: NoiseColor, duration_secs: f32, sample_rate: u32) -> NoiseBuffer {
        let key = (color, (duration_secs.max(0.0) * 1000.0).round() as u32, sample_rate);
        self.buffers
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!(?color, duration_secs, sample_rate, "generating cached noise buffer");
                color.generate(duration_secs, sample_rate)
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}
