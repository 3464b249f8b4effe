//! The six procedural soundscapes and their catalog entries.
//!
//! Each generator is a plain function that builds its graph through a
//! [`VoiceBuilder`] and wires it into the master bus. None of them keep state
//! between plays; everything they create belongs to the voice.

mod binaural;
mod bowl;
mod drone;
mod ocean;
mod rain;
mod wind;

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::voice::VoiceBuilder;

pub use binaural::{binaural, BEAT_HZ, CARRIER_HZ};
pub use bowl::{singing_bowl, STRIKE_INTERVAL_SECS};
pub use drone::drone;
pub use ocean::ocean;
pub use rain::rain;
pub use wind::wind;

/// Builds one sound into a fresh voice
pub type Generator = fn(&mut VoiceBuilder<'_>) -> Result<(), EngineError>;

/// The sounds the engine can play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Ocean,
    Rain,
    Wind,
    Bowl,
    Drone,
    Binaural,
}

impl SoundId {
    pub const ALL: [SoundId; 6] = [
        SoundId::Ocean,
        SoundId::Rain,
        SoundId::Wind,
        SoundId::Bowl,
        SoundId::Drone,
        SoundId::Binaural,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundId::Ocean => "ocean",
            SoundId::Rain => "rain",
            SoundId::Wind => "wind",
            SoundId::Bowl => "bowl",
            SoundId::Drone => "drone",
            SoundId::Binaural => "binaural",
        }
    }

    pub fn generator(self) -> Generator {
        match self {
            SoundId::Ocean => ocean,
            SoundId::Rain => rain,
            SoundId::Wind => wind,
            SoundId::Bowl => singing_bowl,
            SoundId::Drone => drone,
            SoundId::Binaural => binaural,
        }
    }

    pub fn descriptor(self) -> &'static SoundDescriptor {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SoundId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownSound(s.to_string()))
    }
}

/// Playback requirements the engine cannot detect by itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareHint {
    /// Only works with one channel per ear
    Headphones,
}

/// Static metadata shown next to a sound
#[derive(Debug, PartialEq, Eq)]
pub struct SoundDescriptor {
    pub id: SoundId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub hint: Option<HardwareHint>,
}

// Indexed by `SoundId as usize`
static CATALOG: [SoundDescriptor; 6] = [
    SoundDescriptor {
        id: SoundId::Ocean,
        name: "Ocean Waves",
        description: "Slow surf rolling in and out",
        icon: "water",
        hint: None,
    },
    SoundDescriptor {
        id: SoundId::Rain,
        name: "Gentle Rain",
        description: "Distant rainfall with close droplets",
        icon: "rainy",
        hint: None,
    },
    SoundDescriptor {
        id: SoundId::Wind,
        name: "Soft Wind",
        description: "A breathing breeze",
        icon: "leaf",
        hint: None,
    },
    SoundDescriptor {
        id: SoundId::Bowl,
        name: "Singing Bowl",
        description: "A struck bowl ringing out every few breaths",
        icon: "notifications",
        hint: None,
    },
    SoundDescriptor {
        id: SoundId::Drone,
        name: "Deep Drone",
        description: "A dark, wide low chord",
        icon: "pulse",
        hint: None,
    },
    SoundDescriptor {
        id: SoundId::Binaural,
        name: "Binaural Focus",
        description: "A 10 Hz beat between the ears",
        icon: "headset",
        hint: Some(HardwareHint::Headphones),
    },
];

/// Every sound, in display order
pub fn catalog() -> &'static [SoundDescriptor] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_id() {
        for id in SoundId::ALL {
            assert_eq!(id.descriptor().id, id);
        }
        assert_eq!(catalog().len(), SoundId::ALL.len());
    }

    #[test]
    fn parses_ids() {
        assert_eq!("ocean".parse::<SoundId>(), Ok(SoundId::Ocean));
        assert_eq!(" Binaural ".parse::<SoundId>(), Ok(SoundId::Binaural));
        assert_eq!(
            "thunder".parse::<SoundId>(),
            Err(EngineError::UnknownSound("thunder".into()))
        );
        for id in SoundId::ALL {
            assert_eq!(id.to_string().parse::<SoundId>(), Ok(id));
        }
    }

    #[test]
    fn only_binaural_needs_headphones() {
        let flagged: Vec<_> = catalog().iter().filter(|d| d.hint.is_some()).map(|d| d.id).collect();
        assert_eq!(flagged, vec![SoundId::Binaural]);
    }
}
