//! Parameter metadata: names, units, ranges and defaults.
//!
//! Every controllable scalar in the instrument is described by a
//! [`ParamDescriptor`]. The descriptor is immutable; the live value lives in a
//! [`ParamCell`](crate::ParamCell) that carries a copy of it so writes can be
//! clamped without looking anything up.
//!
//! ## Normalization
//!
//! Gesture features and parameters are related through the normalized
//! `[0, 1]` space: a feature value is first normalized against its own domain,
//! then denormalized into the parameter's range.
//!
//! ```rust
//! use tactus_core::ParamDescriptor;
//!
//! let cutoff = ParamDescriptor::lowpass_cutoff();
//! assert_eq!(cutoff.denormalize(0.5), 10000.0);
//! assert_eq!(cutoff.normalize(20000.0), 1.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Metadata for one named parameter.
///
/// `name` is the stable identifier used by bindings, configuration files and
/// the [`ParamRegistry`](crate::ParamRegistry); `short_name` is for compact
/// displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable identifier (e.g., `"gainLevel"`, `"lpfc"`).
    pub name: &'static str,

    /// Short display label, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value the cell holds after construction or reset.
    pub default: f32,
}

impl ParamDescriptor {
    /// Creates a descriptor with an explicit range.
    ///
    /// `default` is clamped into `[min, max]`.
    pub fn new(name: &'static str, short_name: &'static str, min: f32, max: f32, default: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    /// Sets the display unit.
    pub const fn with_unit(mut self, unit: ParamUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Output level of the gain stage (0–1, default 0.5).
    pub fn gain_level() -> Self {
        Self::new(crate::GAIN_LEVEL, "Gain", 0.0, 1.0, 0.5).with_unit(ParamUnit::Percent)
    }

    /// Pitch control of the stretch stage (0–1, default 0.5 = unshifted).
    pub fn pitch() -> Self {
        Self::new(crate::PITCH, "Pitch", 0.0, 1.0, 0.5)
    }

    /// Tempo control of the stretch stage (0–1, default 0.5 = original speed).
    pub fn tempo() -> Self {
        Self::new(crate::TEMPO, "Tempo", 0.0, 1.0, 0.5)
    }

    /// Low-pass cutoff in Hz (0–20000, default 1000).
    pub fn lowpass_cutoff() -> Self {
        Self::new(crate::LOWPASS_CUTOFF, "Cutoff", 0.0, 20000.0, 1000.0).with_unit(ParamUnit::Hertz)
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default so a bad write can never poison the cell.
    ///
    /// ```rust
    /// use tactus_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_level();
    /// assert_eq!(desc.clamp(-1.0), 0.0);
    /// assert_eq!(desc.clamp(2.0), 1.0);
    /// assert_eq!(desc.clamp(f32::NAN), 0.5);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Converts a plain value to the normalized range (0.0 to 1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    /// Converts a normalized value (0.0 to 1.0) to the parameter's range.
    ///
    /// Inverse of [`normalize`](Self::normalize). The result is not clamped.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.min + normalized * (self.max - self.min)
    }

    /// Formats a value with this parameter's unit suffix.
    #[cfg(feature = "std")]
    pub fn format(&self, value: f32) -> String {
        match self.unit {
            ParamUnit::Hertz => format!("{value:.0}{}", self.unit.suffix()),
            ParamUnit::Percent => format!("{:.0}{}", value * 100.0, self.unit.suffix()),
            ParamUnit::None => format!("{value:.3}"),
        }
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) - filter cutoff.
    Hertz,

    /// Percentage (%) - level parameters stored as 0–1.
    Percent,

    /// No unit - dimensionless controls.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Percent => "%",
            ParamUnit::None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptors_match_instrument_ranges() {
        let gain = ParamDescriptor::gain_level();
        assert_eq!((gain.min, gain.max, gain.default), (0.0, 1.0, 0.5));

        let cutoff = ParamDescriptor::lowpass_cutoff();
        assert_eq!((cutoff.min, cutoff.max, cutoff.default), (0.0, 20000.0, 1000.0));
        assert_eq!(cutoff.unit, ParamUnit::Hertz);
    }

    #[test]
    fn test_new_orders_swapped_bounds() {
        let desc = ParamDescriptor::new("x", "x", 10.0, -10.0, 50.0);
        assert_eq!(desc.min, -10.0);
        assert_eq!(desc.max, 10.0);
        assert_eq!(desc.default, 10.0, "default should be clamped into range");
    }

    #[test]
    fn test_normalize_denormalize_inverse() {
        let desc = ParamDescriptor::lowpass_cutoff();
        for v in [0.0, 1000.0, 12345.0, 20000.0] {
            let back = desc.denormalize(desc.normalize(v));
            assert!((back - v).abs() < 0.01, "{v} came back as {back}");
        }
    }

    #[test]
    fn test_degenerate_range_normalizes_to_zero() {
        let desc = ParamDescriptor::new("fixed", "fixed", 3.0, 3.0, 3.0);
        assert_eq!(desc.normalize(3.0), 0.0);
        assert_eq!(desc.denormalize(0.7), 3.0);
    }

    #[test]
    fn test_format_uses_unit() {
        assert_eq!(ParamDescriptor::lowpass_cutoff().format(440.0), "440 Hz");
        assert_eq!(ParamDescriptor::gain_level().format(0.25), "25%");
        assert_eq!(ParamDescriptor::pitch().format(0.5), "0.500");
    }
}
