//! Engine configuration

use crate::error::EngineError;

/// Settings for an [`AudioEngine`](crate::AudioEngine).
///
/// Built with `with_*` methods and validated when the engine is created:
///
/// ```
/// use calmwave::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_sample_rate(44_100)
///     .with_initial_volume(0.5)
///     .with_noise_reuse(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Graph sample rate in Hz. Overridden by the device rate when using a device.
    pub sample_rate: u32,
    /// Length of generated noise loops
    pub noise_duration_secs: f32,
    /// Share noise buffers between plays instead of generating fresh ones
    pub reuse_noise_buffers: bool,
    /// Master volume at start-up, 0.0..=1.0
    pub initial_volume: f32,
    /// Smoothing applied to master volume changes
    pub master_smoothing_ms: f32,
    /// Capacity of each node's message queue
    pub message_queue_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            noise_duration_secs: 4.0,
            reuse_noise_buffers: false,
            initial_volume: 0.7,
            master_smoothing_ms: 20.0,
            message_queue_size: 64,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_noise_duration(mut self, secs: f32) -> Self {
        self.noise_duration_secs = secs;
        self
    }

    pub fn with_noise_reuse(mut self, reuse: bool) -> Self {
        self.reuse_noise_buffers = reuse;
        self
    }

    pub fn with_initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn with_master_smoothing_ms(mut self, ms: f32) -> Self {
        self.master_smoothing_ms = ms;
        self
    }

    pub fn with_message_queue_size(mut self, size: usize) -> Self {
        self.message_queue_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_rate == 0 {
            return Err(invalid("sample_rate", self.sample_rate as f64));
        }
        if !(self.noise_duration_secs.is_finite() && self.noise_duration_secs > 0.0) {
            return Err(invalid("noise_duration_secs", self.noise_duration_secs as f64));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(invalid("initial_volume", self.initial_volume as f64));
        }
        if !(self.master_smoothing_ms.is_finite() && self.master_smoothing_ms >= 0.0) {
            return Err(invalid("master_smoothing_ms", self.master_smoothing_ms as f64));
        }
        if self.message_queue_size == 0 {
            return Err(invalid("message_queue_size", 0.0));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64) -> EngineError {
    EngineError::InvalidParameter { name, value }
}
