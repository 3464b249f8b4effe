//! Deep drone: five detuned oscillators spread across the stereo field

use crate::error::EngineError;
use crate::nodes::{Filter, Gain, Mixer, Oscillator, Panner};
use crate::param::{Lfo, Waveform};
use crate::voice::VoiceBuilder;

const LOWPASS_HZ: f32 = 350.0;
const BASE_GAIN: f32 = 0.5;
const BREATH_HZ: f32 = 0.04;
const BREATH_DEPTH: f32 = 0.15;
const OSC_AMPLITUDE: f32 = 0.2;

struct DroneVoice {
    frequency: f32,
    waveform: Waveform,
    detune_cents: f32,
    pan: f32,
}

const VOICES: [DroneVoice; 5] = [
    DroneVoice { frequency: 55.0, waveform: Waveform::Sine, detune_cents: 3.0, pan: -0.6 },
    DroneVoice { frequency: 110.0, waveform: Waveform::Sine, detune_cents: -2.0, pan: 0.4 },
    DroneVoice { frequency: 82.5, waveform: Waveform::Triangle, detune_cents: 4.0, pan: -0.2 },
    DroneVoice { frequency: 165.0, waveform: Waveform::Sine, detune_cents: -5.0, pan: 0.7 },
    DroneVoice { frequency: 330.0, waveform: Waveform::Triangle, detune_cents: 2.0, pan: -0.8 },
];

/// oscillators → panners → stereo mix → lowpass → breathing gain → master
pub fn drone(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let rate = v.sample_rate();

    let mix = v.add(Mixer::stereo());
    let lowpass = v.add(Filter::lowpass(LOWPASS_HZ, rate)?.with_channels(2));
    let breath = v.add(
        Gain::new(BASE_GAIN)
            .without_smoothing()
            .with_lfo(Lfo::sine(BREATH_HZ, BREATH_DEPTH)),
    );

    for voice in &VOICES {
        let osc = v.add(
            Oscillator::new(voice.waveform, voice.frequency)
                .with_detune(voice.detune_cents)
                .with_amplitude(OSC_AMPLITUDE),
        );
        let pan = v.add(Panner::new(voice.pan));
        v.connect(&osc, &pan)?;
        v.connect(&pan, &mix)?;
    }

    v.connect(&mix, &lowpass)?;
    v.connect(&lowpass, &breath)?;
    v.connect_to_master(&breath)
}
