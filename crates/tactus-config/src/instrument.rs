//! The instrument configuration file.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tactus_core::{GAIN_LEVEL, LOWPASS_CUTOFF, ParamRegistry};
use tactus_platform::{GestureFeature, RebindPolicy, TrackerConfig};
use tactus_synth::EnvelopeSettings;

use crate::error::ConfigError;
use crate::validation::{Collector, ValidationError, ValidationResult};

/// Number of bindings the control surface's router holds.
pub const MAX_BINDINGS: usize = 8;

/// Complete instrument configuration.
///
/// Every section is optional; missing fields take the defaults documented on
/// each section.
///
/// # TOML Format
///
/// ```toml
/// [audio]
/// sample_rate = 44100
/// channels = 2
/// block_size = 512
/// max_record_seconds = 10.0
/// capture_mode = "single-take"   # or "looping"
///
/// [envelope.ar]
/// attack_ms = 5.0
/// release_ms = 250.0
///
/// [envelope.adsr]
/// attack_ms = 20.0
/// decay_ms = 120.0
/// sustain = 0.7
/// release_ms = 400.0
///
/// [gesture]
/// width = 800.0
/// height = 600.0
/// direction_buffer_size = 8
///
/// [routing]
/// rebind = { glide = 16 }         # or "jump"
///
/// [[routing.binding]]
/// feature = "y-position"
/// parameter = "gainLevel"
///
/// [mode]
/// space = "sustained"             # or "impulse"
/// discrete_pitch = false
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstrumentConfig {
    /// Audio engine sizing.
    pub audio: AudioConfig,
    /// Envelope timings.
    pub envelope: EnvelopeConfig,
    /// Gesture tracking.
    pub gesture: GestureConfig,
    /// Initial feature → parameter routing.
    pub routing: RoutingConfig,
    /// Initial play mode.
    pub mode: ModeConfig,
}

impl InstrumentConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), bindings = config.routing.bindings.len(), "configuration loaded");
        Ok(config)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every range and name, reporting all problems at once.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut c = Collector::default();

        let a = &self.audio;
        c.range("audio.sample_rate", a.sample_rate, 1.0, 384_000.0);
        c.range("audio.channels", a.channels, 1.0, 8.0);
        c.range("audio.block_size", a.block_size as f64, 16.0, 8192.0);
        c.range("audio.max_record_seconds", a.max_record_seconds, f64::from(f32::EPSILON), 600.0);

        let ar = &self.envelope.ar;
        c.range("envelope.ar.attack_ms", ar.attack_ms, 0.0, 60_000.0);
        c.range("envelope.ar.release_ms", ar.release_ms, 0.0, 60_000.0);
        let adsr = &self.envelope.adsr;
        c.range("envelope.adsr.attack_ms", adsr.attack_ms, 0.0, 60_000.0);
        c.range("envelope.adsr.decay_ms", adsr.decay_ms, 0.0, 60_000.0);
        c.range("envelope.adsr.sustain", adsr.sustain, 0.0, 1.0);
        c.range("envelope.adsr.release_ms", adsr.release_ms, 0.0, 60_000.0);

        let g = &self.gesture;
        c.range("gesture.width", g.width, 1.0, 100_000.0);
        c.range("gesture.height", g.height, 1.0, 100_000.0);
        c.range("gesture.direction_buffer_size", g.direction_buffer_size as f64, 2.0, 1024.0);
        c.range("gesture.velocity_ceiling", g.velocity_ceiling, 1e-6, 10.0);
        c.range("gesture.rolloff_factor", g.rolloff_factor, 1e-6, 0.999);
        c.range("gesture.rolloff_floor", g.rolloff_floor, 0.0, 1.0);
        c.range("gesture.rolloff_interval_ms", g.rolloff_interval_ms, 1.0, 1000.0);
        c.range("gesture.tap_radius", g.tap_radius, 0.0, 1.0);

        self.routing.validate_into(&mut c);
        c.finish()
    }

    /// Tracker settings from the `[gesture]` section.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            width: self.gesture.width,
            height: self.gesture.height,
            direction_buffer_size: self.gesture.direction_buffer_size,
            tap_radius: self.gesture.tap_radius,
        }
    }
}

/// Behavior of the capture side once the recording buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Stop capturing and raise `buffer_full`.
    #[default]
    SingleTake,
    /// Wrap and overwrite the oldest audio.
    Looping,
}

/// `[audio]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Sample rate in Hz (default 44100).
    pub sample_rate: u32,
    /// Channel count for capture and playback (default 2).
    pub channels: u16,
    /// Frames per audio block (default 512).
    pub block_size: usize,
    /// Recording buffer length in seconds (default 10).
    pub max_record_seconds: f32,
    /// What capture does once the buffer fills.
    pub capture_mode: CaptureMode,
}

impl AudioConfig {
    /// Recording capacity in frames per channel.
    pub fn capacity_frames(&self) -> usize {
        (self.sample_rate as f32 * self.max_record_seconds).round().max(1.0) as usize
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
            block_size: 512,
            max_record_seconds: 10.0,
            capture_mode: CaptureMode::SingleTake,
        }
    }
}

/// `[envelope]`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeConfig {
    /// Impulse-space envelope.
    pub ar: ArConfig,
    /// Sustained-space envelope.
    pub adsr: AdsrConfig,
}

/// `[envelope.ar]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArConfig {
    /// Attack time in ms (default 5).
    pub attack_ms: f32,
    /// Release time in ms (default 250).
    pub release_ms: f32,
}

impl ArConfig {
    /// Envelope settings for an AR envelope.
    pub fn settings(&self) -> EnvelopeSettings {
        EnvelopeSettings::ar(self.attack_ms, self.release_ms)
    }
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            attack_ms: 5.0,
            release_ms: 250.0,
        }
    }
}

/// `[envelope.adsr]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsrConfig {
    /// Attack time in ms (default 20).
    pub attack_ms: f32,
    /// Decay time in ms (default 120).
    pub decay_ms: f32,
    /// Sustain level in `[0, 1]` (default 0.7).
    pub sustain: f32,
    /// Release time in ms (default 400).
    pub release_ms: f32,
}

impl AdsrConfig {
    /// Envelope settings for an ADSR envelope.
    pub fn settings(&self) -> EnvelopeSettings {
        EnvelopeSettings::adsr(self.attack_ms, self.decay_ms, self.sustain, self.release_ms)
    }
}

impl Default for AdsrConfig {
    fn default() -> Self {
        Self {
            attack_ms: 20.0,
            decay_ms: 120.0,
            sustain: 0.7,
            release_ms: 400.0,
        }
    }
}

/// `[gesture]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Touch surface width in component units (default 800).
    pub width: f32,
    /// Touch surface height in component units (default 600).
    pub height: f32,
    /// Primary-finger samples per direction estimate (default 8).
    pub direction_buffer_size: usize,
    /// Velocity mapped to the top of a parameter's range (default 0.05).
    pub velocity_ceiling: f32,
    /// Per-tick multiplier of the release rolloff (default 0.9).
    pub rolloff_factor: f32,
    /// Velocity at which the rolloff stops (default 0.001).
    pub rolloff_floor: f32,
    /// Rolloff timer period in ms (default 30).
    pub rolloff_interval_ms: u32,
    /// Largest normalized travel still counted as a tap (default 0.02).
    pub tap_radius: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            direction_buffer_size: 8,
            velocity_ceiling: 0.05,
            rolloff_factor: 0.9,
            rolloff_floor: 0.001,
            rolloff_interval_ms: 30,
            tap_radius: 0.02,
        }
    }
}

/// How a re-bound parameter moves, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebindSetting {
    /// `rebind = "jump"`
    #[default]
    Jump,
    /// `rebind = { glide = 16 }`
    Glide(u32),
}

impl From<RebindSetting> for RebindPolicy {
    fn from(setting: RebindSetting) -> Self {
        match setting {
            RebindSetting::Jump => RebindPolicy::Jump,
            RebindSetting::Glide(steps) => RebindPolicy::Glide { steps },
        }
    }
}

/// One `[[routing.binding]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Feature name, e.g. `"y-position"`.
    pub feature: String,
    /// Parameter name, e.g. `"gainLevel"`.
    pub parameter: String,
}

impl BindingConfig {
    /// Creates a binding entry.
    pub fn new(feature: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            parameter: parameter.into(),
        }
    }
}

/// `[routing]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Rebind policy.
    pub rebind: RebindSetting,
    /// Initial bindings; y-position → gain and x-position → cutoff when absent.
    #[serde(rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

impl RoutingConfig {
    fn validate_into(&self, c: &mut Collector) {
        if self.bindings.len() > MAX_BINDINGS {
            c.push(ValidationError::TooManyBindings {
                count: self.bindings.len(),
                capacity: MAX_BINDINGS,
            });
        }

        let known = ParamRegistry::with_defaults();
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if binding.feature.parse::<GestureFeature>().is_err() {
                c.push(ValidationError::UnknownFeature(binding.feature.clone()));
            }
            if known.get(&binding.parameter).is_none() {
                c.push(ValidationError::UnknownParameter(binding.parameter.clone()));
            } else if !seen.insert(binding.parameter.as_str()) {
                c.push(ValidationError::DuplicateBinding(binding.parameter.clone()));
            }
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            rebind: RebindSetting::Jump,
            bindings: vec![
                BindingConfig::new(GestureFeature::YPosition.name(), GAIN_LEVEL),
                BindingConfig::new(GestureFeature::XPosition.name(), LOWPASS_CUTOFF),
            ],
        }
    }
}

/// Which envelope touches drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// Touch holds an ADSR note; release rolls velocity off.
    #[default]
    Sustained,
    /// Touch fires an AR hit; discrete pitch is unavailable.
    Impulse,
}

/// `[mode]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeConfig {
    /// Initial space (default sustained).
    pub space: Space,
    /// Start with discrete pitch enabled (default off).
    pub discrete_pitch: bool,
}
