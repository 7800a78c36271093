//! Shared CLI helpers used across multiple commands.

use std::path::Path;
use tactus_config::InstrumentConfig;

/// Loads the instrument configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<InstrumentConfig> {
    match path {
        Some(path) => {
            let config = InstrumentConfig::load(path)?;
            println!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(InstrumentConfig::default()),
    }
}

/// Peak absolute sample value.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Linear amplitude to dBFS, floored at -120.
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}
