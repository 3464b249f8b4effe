//! Error types surfaced by the engine and the playback controller.

use std::fmt;

/// Errors returned by [`AudioEngine`](crate::AudioEngine) and
/// [`PlaybackController`](crate::PlaybackController).
///
/// There is no teardown variant: releasing a voice never fails,
/// it reports what it could not find in a [`TeardownReport`](crate::TeardownReport).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A node or connection could not be built (bad filter parameters,
    /// unknown node id, ...). The partially built voice has been released.
    Construction(String),
    /// A sound identifier that is not in the catalog.
    UnknownSound(String),
    /// A control value that cannot be applied.
    InvalidParameter { name: &'static str, value: f64 },
    /// The engine has no output sink to render into.
    NoOutput,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Construction(msg) => write!(f, "Failed to build audio graph: {}", msg),
            EngineError::UnknownSound(id) => write!(f, "Unknown sound: {}", id),
            EngineError::InvalidParameter { name, value } => {
                write!(f, "Invalid value for {}: {}", name, value)
            }
            EngineError::NoOutput => write!(f, "No output sink configured"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<biquad::Errors> for EngineError {
    fn from(err: biquad::Errors) -> Self {
        EngineError::Construction(format!("filter coefficients rejected: {:?}", err))
    }
}
