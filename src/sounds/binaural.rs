//! Binaural beat. Needs headphones: the beat only exists when each ear hears
//! exactly one of the two tones.

use crate::error::EngineError;
use crate::nodes::{Oscillator, Panner};
use crate::voice::VoiceBuilder;

/// Left ear tone
pub const CARRIER_HZ: f32 = 200.0;
/// Offset of the right ear tone; the perceived beat rate
pub const BEAT_HZ: f32 = 10.0;
const AMPLITUDE: f32 = 0.3;

pub fn binaural(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let left = v.add(Oscillator::sine(CARRIER_HZ).with_amplitude(AMPLITUDE));
    let left_pan = v.add(Panner::hard_left());
    v.connect(&left, &left_pan)?;
    v.connect_to_master(&left_pan)?;

    let right = v.add(Oscillator::sine(CARRIER_HZ + BEAT_HZ).with_amplitude(AMPLITUDE));
    let right_pan = v.add(Panner::hard_right());
    v.connect(&right, &right_pan)?;
    v.connect_to_master(&right_pan)
}
