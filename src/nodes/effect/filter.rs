//! Second-order (biquad) filter effect

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz, Q_BUTTERWORTH_F32};
use dasp_graph::{Buffer, Input};

use crate::error::EngineError;
use crate::node::{sum_inputs, AudioNode, ProcessContext};

/// Filter response shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
    LowPass,
    HighPass,
    BandPass,
    /// Boost or cut (dB) below the corner frequency
    LowShelf(f32),
    /// Boost or cut (dB) above the corner frequency
    HighShelf(f32),
}

impl FilterKind {
    fn biquad_type(self) -> biquad::Type<f32> {
        match self {
            FilterKind::LowPass => biquad::Type::LowPass,
            FilterKind::HighPass => biquad::Type::HighPass,
            FilterKind::BandPass => biquad::Type::BandPass,
            FilterKind::LowShelf(db) => biquad::Type::LowShelf(db),
            FilterKind::HighShelf(db) => biquad::Type::HighShelf(db),
        }
    }
}

/// Messages to retune a [`Filter`]
///
/// Values that would give invalid coefficients are ignored.
#[derive(Clone, Copy, Debug)]
pub enum FilterMessage {
    SetFrequency(f32),
    SetQ(f32),
}

/// A biquad filter applied independently to each channel.
///
/// Coefficients depend on the sample rate, so filters are built against the
/// rate of the engine they will run in. Construction fails if the corner
/// frequency is above Nyquist.
pub struct Filter {
    kind: FilterKind,
    frequency: f32,
    q: f32,
    sample_rate: u32,
    stages: Vec<DirectForm2Transposed<f32>>,
}

impl Filter {
    pub fn new(kind: FilterKind, frequency: f32, q: f32, sample_rate: u32) -> Result<Self, EngineError> {
        let coeffs = coefficients(kind, frequency, q, sample_rate)?;
        Ok(Self {
            kind,
            frequency,
            q,
            sample_rate,
            stages: vec![DirectForm2Transposed::<f32>::new(coeffs)],
        })
    }

    /// Butterworth lowpass
    pub fn lowpass(frequency: f32, sample_rate: u32) -> Result<Self, EngineError> {
        Self::new(FilterKind::LowPass, frequency, Q_BUTTERWORTH_F32, sample_rate)
    }

    pub fn bandpass(frequency: f32, q: f32, sample_rate: u32) -> Result<Self, EngineError> {
        Self::new(FilterKind::BandPass, frequency, q, sample_rate)
    }

    pub fn high_shelf(frequency: f32, gain_db: f32, sample_rate: u32) -> Result<Self, EngineError> {
        Self::new(FilterKind::HighShelf(gain_db), frequency, Q_BUTTERWORTH_F32, sample_rate)
    }

    /// Run on `channels` independent channels (1 or 2)
    pub fn with_channels(mut self, channels: usize) -> Self {
        let channels = channels.clamp(1, 2);
        let stage = self.stages[0].clone();
        self.stages = vec![stage; channels];
        self
    }

    #[inline]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn q(&self) -> f32 {
        self.q
    }

    fn retune(&mut self, frequency: f32, q: f32) {
        if let Ok(coeffs) = coefficients(self.kind, frequency, q, self.sample_rate) {
            self.frequency = frequency;
            self.q = q;
            for stage in self.stages.iter_mut() {
                stage.update_coefficients(coeffs);
            }
        }
    }
}

fn coefficients(kind: FilterKind, frequency: f32, q: f32, sample_rate: u32) -> Result<Coefficients<f32>, EngineError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(EngineError::Construction(format!("filter frequency {} Hz", frequency)));
    }
    Ok(Coefficients::<f32>::from_params(
        kind.biquad_type(),
        (sample_rate as f32).hz(),
        frequency.hz(),
        q,
    )?)
}

impl AudioNode for Filter {
    type Message = FilterMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = FilterMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                FilterMessage::SetFrequency(f) => self.retune(f, self.q),
                FilterMessage::SetQ(q) => self.retune(self.frequency, q),
            }
        }

        sum_inputs(inputs, outputs);

        for (buffer, stage) in outputs.iter_mut().zip(self.stages.iter_mut()) {
            for sample in buffer.iter_mut() {
                *sample = stage.run(*sample);
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize { usize::MAX }

    #[inline]
    fn num_outputs(&self) -> usize { self.stages.len() }
}
