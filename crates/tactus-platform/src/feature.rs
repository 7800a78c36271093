//! Gesture features that can drive a parameter.
//!
//! A feature is a scalar read from the [`GestureTracker`](crate::GestureTracker)
//! together with its natural domain. Features are addressed by stable
//! kebab-case names in configuration files and on the command line.

#[cfg(not(feature = "std"))]
use alloc::string::ToString;

use core::fmt;
use core::str::FromStr;

use crate::error::BindingError;

/// A scalar derived from the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureFeature {
    /// Horizontal position of the primary finger, `[0, 1]` left to right.
    XPosition,
    /// Vertical position of the primary finger, `[0, 1]` top to bottom.
    YPosition,
    /// Speed of the primary finger in normalized units per update.
    Velocity,
    /// Distance of the most recently added finger from the component origin.
    Distance,
    /// Horizontal component of the stroke direction, `[-1, 1]`.
    DirectionX,
    /// Vertical component of the stroke direction, `[-1, 1]`.
    DirectionY,
    /// Horizontal position of the second finger.
    SecondX,
    /// Vertical position of the second finger.
    SecondY,
}

/// Closed interval a feature's values fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDomain {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl FeatureDomain {
    /// Unit interval `[0, 1]`.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };
    /// Signed unit interval `[-1, 1]`.
    pub const SIGNED: Self = Self { min: -1.0, max: 1.0 };

    /// Position of `value` inside the domain as `[0, 1]`, clamped.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl GestureFeature {
    /// Every feature, in declaration order.
    pub const ALL: [GestureFeature; 8] = [
        GestureFeature::XPosition,
        GestureFeature::YPosition,
        GestureFeature::Velocity,
        GestureFeature::Distance,
        GestureFeature::DirectionX,
        GestureFeature::DirectionY,
        GestureFeature::SecondX,
        GestureFeature::SecondY,
    ];

    /// Stable name used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            GestureFeature::XPosition => "x-position",
            GestureFeature::YPosition => "y-position",
            GestureFeature::Velocity => "velocity",
            GestureFeature::Distance => "distance",
            GestureFeature::DirectionX => "direction-x",
            GestureFeature::DirectionY => "direction-y",
            GestureFeature::SecondX => "second-x",
            GestureFeature::SecondY => "second-y",
        }
    }

    /// Natural domain of the feature.
    ///
    /// Velocity has no fixed upper bound; `velocity_ceiling` is the speed that
    /// maps to the top of a bound parameter's range.
    pub fn domain(self, velocity_ceiling: f32) -> FeatureDomain {
        match self {
            GestureFeature::Velocity => FeatureDomain {
                min: 0.0,
                max: velocity_ceiling.max(f32::EPSILON),
            },
            GestureFeature::DirectionX | GestureFeature::DirectionY => FeatureDomain::SIGNED,
            _ => FeatureDomain::UNIT,
        }
    }

    /// Fingers that must be down for a binding on this feature to be active.
    ///
    /// Velocity needs none so a release rolloff keeps driving its bindings.
    pub const fn min_fingers(self) -> usize {
        match self {
            GestureFeature::Velocity => 0,
            GestureFeature::SecondX | GestureFeature::SecondY => 2,
            _ => 1,
        }
    }

    /// True for positional features, which snap to pitch buckets in discrete mode.
    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            GestureFeature::XPosition
                | GestureFeature::YPosition
                | GestureFeature::SecondX
                | GestureFeature::SecondY
        )
    }
}

impl fmt::Display for GestureFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GestureFeature {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GestureFeature::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| BindingError::UnknownFeature(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for feature in GestureFeature::ALL {
            assert_eq!(feature.name().parse::<GestureFeature>().unwrap(), feature);
            assert_eq!(feature.to_string(), feature.name());
        }
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(" Y-Position ".parse::<GestureFeature>().unwrap(), GestureFeature::YPosition);
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "pressure".parse::<GestureFeature>().unwrap_err();
        assert!(matches!(err, BindingError::UnknownFeature(ref name) if name == "pressure"));
    }

    #[test]
    fn test_second_finger_features_need_two_fingers() {
        assert_eq!(GestureFeature::SecondY.min_fingers(), 2);
        assert_eq!(GestureFeature::YPosition.min_fingers(), 1);
        assert_eq!(GestureFeature::Velocity.min_fingers(), 0);
    }

    #[test]
    fn test_domain_normalize_clamps() {
        let d = GestureFeature::DirectionX.domain(0.05);
        assert_eq!(d.normalize(0.0), 0.5);
        assert_eq!(d.normalize(-3.0), 0.0);
        let v = GestureFeature::Velocity.domain(0.05);
        assert_eq!(v.normalize(0.1), 1.0);
    }
}
