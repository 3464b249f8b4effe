mod common;

use calmwave::noise::{brown_noise, pink_noise, white_noise, NoiseCache, NoiseColor};
use common::{band_db, welch_psd};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const RATE: u32 = 48_000;
const SEGMENT: usize = 4096;
/// Octave bands well above the brown integrator's corner and below Nyquist
const OCTAVES: [(f32, f32); 5] = [
    (375.0, 750.0),
    (750.0, 1_500.0),
    (1_500.0, 3_000.0),
    (3_000.0, 6_000.0),
    (6_000.0, 12_000.0),
];

/// dB change from each octave band to the next
fn octave_steps(samples: &[f32]) -> Vec<f32> {
    let psd = welch_psd(samples, SEGMENT);
    let levels: Vec<f32> = OCTAVES
        .iter()
        .map(|&(lo, hi)| band_db(&psd, SEGMENT, RATE, lo, hi))
        .collect();
    levels.windows(2).map(|w| w[1] - w[0]).collect()
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

#[test]
fn buffer_length_is_duration_times_rate() {
    for color in [NoiseColor::White, NoiseColor::Brown, NoiseColor::Pink] {
        assert_eq!(color.generate(0.5, 44_100).len(), 22_050);
        assert_eq!(color.generate(4.0, 48_000).len(), 192_000);
        assert_eq!(color.generate(1.3, 48_000).len(), 62_400);
    }
}

#[test]
fn white_noise_is_centred_and_bounded() {
    let a = white_noise(2.0, RATE);
    let b = white_noise(2.0, RATE);

    assert!(a.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
    assert!(mean(a.samples()).abs() < 0.01, "mean {}", mean(a.samples()));
    assert_ne!(a.samples(), b.samples());

    // uniform on [-1, 1] has rms 1/sqrt(3)
    assert!((a.rms() - 0.577).abs() < 0.02, "rms {}", a.rms());
}

#[test]
fn white_noise_is_flat() {
    let noise = white_noise(10.0, RATE);
    let steps = octave_steps(noise.samples());
    for step in steps {
        assert!(step.abs() < 1.0, "white noise band step {step} dB");
    }
}

#[test]
fn pink_noise_falls_three_db_per_octave() {
    let noise = pink_noise(10.0, RATE);
    let steps = octave_steps(noise.samples());

    for &step in &steps {
        assert!((-5.0..=-1.0).contains(&step), "pink band step {step} dB in {steps:?}");
    }
    let slope = mean(&steps);
    assert!((slope + 3.0).abs() < 1.0, "pink slope {slope} dB/octave");
}

#[test]
fn brown_noise_falls_faster_than_pink() {
    let brown = brown_noise(10.0, RATE);
    let pink = pink_noise(10.0, RATE);

    let brown_slope = mean(&octave_steps(brown.samples()));
    let pink_slope = mean(&octave_steps(pink.samples()));

    assert!(brown_slope < -4.5, "brown slope {brown_slope} dB/octave");
    assert!(brown_slope < pink_slope - 1.5);
    assert!(brown.samples().iter().all(|s| s.abs() <= 3.5 + 1e-4));
}

#[test]
fn seeded_generation_is_reproducible() {
    let a = NoiseColor::Pink.generate_with(&mut SmallRng::seed_from_u64(7), 0.25, RATE);
    let b = NoiseColor::Pink.generate_with(&mut SmallRng::seed_from_u64(7), 0.25, RATE);
    let c = NoiseColor::Pink.generate_with(&mut SmallRng::seed_from_u64(8), 0.25, RATE);

    assert_eq!(a.samples(), b.samples());
    assert_ne!(a.samples(), c.samples());
}

#[test]
fn cache_shares_buffers_per_color_and_rate() {
    let mut cache = NoiseCache::new();

    let first = cache.get_or_generate(NoiseColor::Brown, 1.0, RATE);
    let again = cache.get_or_generate(NoiseColor::Brown, 1.0, RATE);
    let other_rate = cache.get_or_generate(NoiseColor::Brown, 1.0, 44_100);
    let other_color = cache.get_or_generate(NoiseColor::White, 1.0, RATE);

    assert!(first.ptr_eq(&again));
    assert!(!first.ptr_eq(&other_rate));
    assert!(!first.ptr_eq(&other_color));
    assert_eq!(cache.len(), 3);
}
