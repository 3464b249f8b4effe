//! Soft wind

use crate::error::EngineError;
use crate::noise::NoiseColor;
use crate::nodes::{BufferSource, Filter, Gain};
use crate::param::Lfo;
use crate::voice::VoiceBuilder;

const LOWPASS_HZ: f32 = 600.0;
const BASE_GAIN: f32 = 0.5;
const GUST_HZ: f32 = 0.03;
const GUST_DEPTH: f32 = 0.3;

/// pink noise → lowpass → breathing gain → master
pub fn wind(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let rate = v.sample_rate();
    let noise = v.noise(NoiseColor::Pink);

    let source = v.add(BufferSource::looping(&noise));
    let lowpass = v.add(Filter::lowpass(LOWPASS_HZ, rate)?);
    let gust = v.add(
        Gain::new(BASE_GAIN)
            .without_smoothing()
            .with_lfo(Lfo::sine(GUST_HZ, GUST_DEPTH)),
    );

    v.connect(&source, &lowpass)?;
    v.connect(&lowpass, &gust)?;
    v.connect_to_master(&gust)
}
