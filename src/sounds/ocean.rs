//! Ocean waves: low-passed brown noise riding two slow swells

use crate::error::EngineError;
use crate::noise::NoiseColor;
use crate::nodes::{BufferSource, Filter, Gain};
use crate::param::Lfo;
use crate::voice::VoiceBuilder;

const LOWPASS_HZ: f32 = 400.0;
const BASE_GAIN: f32 = 0.5;
/// Tide: the surf rolling in and out
const TIDE_HZ: f32 = 0.06;
const TIDE_DEPTH: f32 = 0.2;
/// Crash intensity: some sets of waves land harder than others
const CRASH_HZ: f32 = 0.015;
const CRASH_DEPTH: f32 = 0.15;

/// brown noise → lowpass → gain(base + tide + crash) → master
pub fn ocean(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let rate = v.sample_rate();
    let noise = v.noise(NoiseColor::Brown);

    let source = v.add(BufferSource::looping(&noise));
    let lowpass = v.add(Filter::lowpass(LOWPASS_HZ, rate)?);
    let swell = v.add(
        Gain::new(BASE_GAIN)
            .without_smoothing()
            .with_lfo(Lfo::sine(TIDE_HZ, TIDE_DEPTH))
            .with_lfo(Lfo::triangle(CRASH_HZ, CRASH_DEPTH)),
    );

    v.connect(&source, &lowpass)?;
    v.connect(&lowpass, &swell)?;
    v.connect_to_master(&swell)
}
