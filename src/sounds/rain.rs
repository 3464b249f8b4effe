//! Gentle rain: a distant pink wash plus close white-noise droplets

use crate::error::EngineError;
use crate::noise::NoiseColor;
use crate::nodes::{BufferSource, Filter, Gain};
use crate::param::Lfo;
use crate::voice::VoiceBuilder;

const WASH_LOWPASS_HZ: f32 = 800.0;
const WASH_GAIN: f32 = 0.6;

const DROPLET_BAND_HZ: f32 = 4_500.0;
const DROPLET_Q: f32 = 1.2;
const DROPLET_SHELF_HZ: f32 = 7_000.0;
const DROPLET_SHELF_DB: f32 = -8.0;
const DROPLET_GAIN: f32 = 0.25;

const MIX_GAIN: f32 = 0.7;
const GUST_HZ: f32 = 0.1;
const GUST_DEPTH: f32 = 0.15;

/// ```text
/// pink  → lowpass 800 Hz ───────────────────→ wash gain ──┐
///                                                         ├→ mix gain (+gust) → master
/// white → bandpass 4.5 kHz → high shelf 7 kHz → drop gain ┘
/// ```
pub fn rain(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let rate = v.sample_rate();

    let mix = v.add(
        Gain::new(MIX_GAIN)
            .without_smoothing()
            .with_lfo(Lfo::sine(GUST_HZ, GUST_DEPTH)),
    );

    let wash_noise = v.noise(NoiseColor::Pink);
    let wash = v.add(BufferSource::looping(&wash_noise));
    let wash_lowpass = v.add(Filter::lowpass(WASH_LOWPASS_HZ, rate)?);
    let wash_gain = v.add(Gain::new(WASH_GAIN).without_smoothing().with_channels(1));
    v.connect(&wash, &wash_lowpass)?;
    v.connect(&wash_lowpass, &wash_gain)?;
    v.connect(&wash_gain, &mix)?;

    let droplet_noise = v.noise(NoiseColor::White);
    let droplets = v.add(BufferSource::looping(&droplet_noise));
    let band = v.add(Filter::bandpass(DROPLET_BAND_HZ, DROPLET_Q, rate)?);
    let shelf = v.add(Filter::high_shelf(DROPLET_SHELF_HZ, DROPLET_SHELF_DB, rate)?);
    let droplet_gain = v.add(Gain::new(DROPLET_GAIN).without_smoothing().with_channels(1));
    v.connect(&droplets, &band)?;
    v.connect(&band, &shelf)?;
    v.connect(&shelf, &droplet_gain)?;
    v.connect(&droplet_gain, &mix)?;

    v.connect_to_master(&mix)
}
