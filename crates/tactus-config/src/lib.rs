//! Configuration for the tactus instrument.
//!
//! A single TOML file seeds the audio engine sizing, envelope timings, gesture
//! tracking constants, the initial feature → parameter routing and the start
//! mode. Runtime binding edits are never written back.
//!
//! # Example
//!
//! ```rust
//! use tactus_config::{InstrumentConfig, Space};
//!
//! let config = InstrumentConfig::from_toml(r#"
//!     [audio]
//!     channels = 1
//!
//!     [mode]
//!     space = "impulse"
//! "#).unwrap();
//!
//! assert_eq!(config.audio.channels, 1);
//! assert_eq!(config.mode.space, Space::Impulse);
//! ```

mod error;
mod instrument;

/// Range and name validation.
pub mod validation;

pub use error::ConfigError;
pub use instrument::{
    AdsrConfig, ArConfig, AudioConfig, BindingConfig, CaptureMode, EnvelopeConfig, GestureConfig,
    InstrumentConfig, MAX_BINDINGS, ModeConfig, RebindSetting, RoutingConfig, Space,
};
pub use validation::{ValidationError, ValidationResult};
