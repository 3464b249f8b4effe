//! Output device discovery.
//!
//! ```no_run
//! use calmwave::{AudioEngine, CpalDevice, EngineConfig};
//!
//! for (i, device) in CpalDevice::list_outputs().iter().enumerate() {
//!     println!("[{}] {} ({} Hz, {} ch)", i, device.name(), device.sample_rate(), device.channels());
//! }
//!
//! let device = CpalDevice::default_output().expect("no output device");
//! let engine = AudioEngine::with_device(&device, EngineConfig::default())?;
//! # Ok::<(), calmwave::EngineError>(())
//! ```

use cpal::traits::{DeviceTrait, HostTrait};

/// A discovered audio output device.
///
/// Once you have a device, [`AudioEngine::with_device`](crate::AudioEngine::with_device)
/// builds an engine at its sample rate with a [`CpalSink`](crate::nodes::CpalSink) attached.
pub struct CpalDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,

    name: String,
    sample_rate: u32,
    channels: u16,
}

impl CpalDevice {
    fn from_device(device: cpal::Device) -> Option<Self> {
        let config = match device.default_output_config() {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(%err, "skipping device without output config");
                return None;
            }
        };
        let name = device.name().unwrap_or_else(|_| "Unknown".into());

        Some(Self {
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
            name,
            device,
            config,
        })
    }

    /// The system's default output device, if any.
    pub fn default_output() -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        Self::from_device(device)
    }

    /// All output devices. Empty if enumeration fails.
    pub fn list_outputs() -> Vec<Self> {
        let host = cpal::default_host();
        match host.output_devices() {
            Ok(devices) => devices.filter_map(Self::from_device).collect(),
            Err(err) => {
                tracing::warn!(%err, "could not enumerate output devices");
                Vec::new()
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Open a stream on this device and return the sink node feeding it
    pub fn create_sink(&self) -> crate::nodes::CpalSink {
        crate::nodes::CpalSink::new(&self.device, &self.config)
    }
}
