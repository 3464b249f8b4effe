//! Waveforms, low-frequency oscillators and modulated parameters.
//!
//! An [`Lfo`] is not a graph node: it never produces audible output, it only
//! moves a parameter of the node that owns it. A [`Param`] is a base value
//! plus any number of LFOs summed on top of it, which is how a gain stage is
//! made to swell or an oscillator is made to wobble.

/// Periodic waveform shapes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Value of the waveform at `phase` (0.0..1.0), in -1.0..=1.0.
    ///
    /// Every shape starts at zero (or its rising edge) at phase 0.
    #[inline]
    pub fn at(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (phase * core::f32::consts::TAU).sin(),
            Waveform::Triangle => {
                let t = (phase + 0.25).fract();
                1.0 - 4.0 * (t - 0.5).abs()
            }
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// A low-frequency oscillator modulating a parameter.
#[derive(Clone, Copy, Debug)]
pub struct Lfo {
    waveform: Waveform,
    frequency: f32,
    depth: f32,
    /// Kept in f64: sub-hertz steps are only a few f32 ulps wide
    phase: f64,
}

impl Lfo {
    /// Create an LFO swinging `±depth` around zero at `frequency` Hz.
    pub fn new(waveform: Waveform, frequency: f32, depth: f32) -> Self {
        Self {
            waveform,
            frequency: frequency.max(0.0),
            depth,
            phase: 0.0,
        }
    }

    pub fn sine(frequency: f32, depth: f32) -> Self {
        Self::new(Waveform::Sine, frequency, depth)
    }

    pub fn triangle(frequency: f32, depth: f32) -> Self {
        Self::new(Waveform::Triangle, frequency, depth)
    }

    /// Start at a given phase offset (0.0..1.0)
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase.rem_euclid(1.0) as f64;
        self
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Current value, then advance by one sample.
    #[inline]
    pub fn tick(&mut self, sample_rate: u32) -> f32 {
        let value = self.waveform.at(self.phase as f32) * self.depth;
        self.phase += self.frequency as f64 / sample_rate as f64;
        self.phase -= self.phase.floor();
        value
    }
}

/// A parameter value with additive LFO modulation.
#[derive(Clone, Debug, Default)]
pub struct Param {
    base: f32,
    modulators: Vec<Lfo>,
}

impl Param {
    pub fn new(base: f32) -> Self {
        Self {
            base,
            modulators: Vec::new(),
        }
    }

    pub fn with_lfo(mut self, lfo: Lfo) -> Self {
        self.modulators.push(lfo);
        self
    }

    #[inline]
    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn set_base(&mut self, base: f32) {
        self.base = base;
    }

    pub fn lfos(&self) -> &[Lfo] {
        &self.modulators
    }

    #[inline]
    pub fn is_modulated(&self) -> bool {
        !self.modulators.is_empty()
    }

    /// Base plus the sum of all modulators, advancing each by one sample.
    #[inline]
    pub fn tick(&mut self, sample_rate: u32) -> f32 {
        let mut value = self.base;
        for lfo in self.modulators.iter_mut() {
            value += lfo.tick(sample_rate);
        }
        value
    }
}

/// Frequency ratio for a pitch offset in cents.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    (cents / 1200.0).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveforms_start_at_zero_and_stay_in_range() {
        for wave in [Waveform::Sine, Waveform::Triangle] {
            assert!(wave.at(0.0).abs() < 1e-6, "{:?}", wave);
            for i in 0..100 {
                let v = wave.at(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
        assert!((Waveform::Triangle.at(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.at(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn square_and_sawtooth_shapes() {
        assert_eq!(Waveform::Square.at(0.0), 1.0);
        assert_eq!(Waveform::Square.at(0.49), 1.0);
        assert_eq!(Waveform::Square.at(0.5), -1.0);
        assert_eq!(Waveform::Sawtooth.at(0.0), -1.0);
        assert!(Waveform::Sawtooth.at(0.5).abs() < 1e-6);
        assert!(Waveform::Sawtooth.at(0.99) > 0.97);
    }

    #[test]
    fn slow_lfo_keeps_its_rate() {
        // 10 s of the ocean's slowest swell at 48 kHz
        let mut lfo = Lfo::triangle(0.015, 0.15);
        for _ in 0..480_000 {
            lfo.tick(48_000);
        }
        assert!((lfo.phase - 0.15).abs() < 1e-6, "phase {}", lfo.phase);
    }

    #[test]
    fn param_sums_modulators_on_base() {
        let mut p = Param::new(0.5)
            .with_lfo(Lfo::sine(1.0, 0.2).with_phase(0.25))
            .with_lfo(Lfo::triangle(1.0, 0.1).with_phase(0.25));
        // both LFOs at their peak
        assert!((p.tick(48_000) - 0.8).abs() < 1e-4);
    }

    #[test]
    fn lfo_completes_a_cycle_at_its_frequency() {
        let mut lfo = Lfo::sine(2.0, 1.0);
        let rate = 1000;
        let values: Vec<f32> = (0..rate / 2).map(|_| lfo.tick(rate)).collect();
        // half a second at 2 Hz is exactly one cycle
        assert!(lfo.tick(rate).abs() < 1e-3);
        let max = values.iter().cloned().fold(f32::MIN, f32::max);
        assert!((max - 1.0).abs() < 1e-3);
    }

    #[test]
    fn cents_ratio() {
        assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-6);
        assert!((cents_to_ratio(0.0) - 1.0).abs() < 1e-6);
        assert!(cents_to_ratio(2.0) > 1.0 && cents_to_ratio(2.0) < 1.0012);
    }
}
