//! Singing bowl: inharmonic partials struck again every few breaths

use crate::error::EngineError;
use crate::node::NodeId;
use crate::nodes::{Envelope, Gain, Oscillator};
use crate::voice::VoiceBuilder;

const FUNDAMENTAL_HZ: f32 = 196.0;
const BUS_GAIN: f32 = 0.3;
const ATTACK_SECS: f32 = 0.05;

/// Seconds between strikes
pub const STRIKE_INTERVAL_SECS: f64 = 12.0;

/// Partials are reaped a little after their envelope has gone silent
const REAP_MARGIN_SECS: f64 = 0.1;

struct Partial {
    ratio: f32,
    decay_secs: f32,
    weight: f32,
}

const PARTIALS: [Partial; 6] = [
    Partial { ratio: 1.0, decay_secs: 5.0, weight: 1.0 },
    Partial { ratio: 2.76, decay_secs: 4.0, weight: 0.5 },
    Partial { ratio: 5.40, decay_secs: 3.0, weight: 0.3 },
    Partial { ratio: 8.93, decay_secs: 2.0, weight: 0.15 },
    Partial { ratio: 13.34, decay_secs: 1.2, weight: 0.08 },
    Partial { ratio: 18.64, decay_secs: 0.8, weight: 0.05 },
];

/// Vibrato rates for the lowest partials; the rest ring steady
const VIBRATO_HZ: [f32; 3] = [4.0, 5.5, 7.0];
const VIBRATO_CENTS: f32 = 2.0;

/// A bus into the master, one strike now and another every
/// [`STRIKE_INTERVAL_SECS`]. Releasing the voice cuts everything at once.
pub fn singing_bowl(v: &mut VoiceBuilder<'_>) -> Result<(), EngineError> {
    let bus = v.add(Gain::new(BUS_GAIN).without_smoothing());
    v.connect_to_master(&bus)?;

    let bus = bus.id();
    strike(v, bus)?;
    v.every(STRIKE_INTERVAL_SECS, move |v| strike(v, bus));
    Ok(())
}

fn strike(v: &mut VoiceBuilder<'_>, bus: NodeId) -> Result<(), EngineError> {
    for (i, partial) in PARTIALS.iter().enumerate() {
        let mut osc = Oscillator::sine(FUNDAMENTAL_HZ * partial.ratio);
        if let Some(&rate) = VIBRATO_HZ.get(i) {
            osc = osc.with_vibrato(rate, VIBRATO_CENTS);
        }
        let envelope = Envelope::new(partial.weight, ATTACK_SECS, partial.decay_secs);
        let lifetime = envelope.duration_secs() as f64 + REAP_MARGIN_SECS;

        let osc = v.add(osc);
        let envelope = v.add(envelope);
        v.connect(&osc, &envelope)?;
        v.connect(&envelope, &bus)?;

        v.remove_after(vec![osc.id(), envelope.id()], lifetime);
    }

    tracing::trace!(voice = ?v.voice(), at = v.now_secs(), "bowl struck");
    Ok(())
}
