//! Small numeric helpers shared by the router and the effect stages.

/// Flush denormal values to zero.
///
/// Feedback paths that decay toward zero otherwise end up in the subnormal
/// range where some CPUs slow down dramatically.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to samples.
///
/// # Arguments
/// * `ms` - Time in milliseconds
/// * `sample_rate` - Sample rate in Hz
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Affine map of `value` from `[from_min, from_max]` onto `[to_min, to_max]`,
/// clamped to the destination range.
///
/// A degenerate source range maps to `to_min`.
///
/// ```rust
/// use tactus_core::remap_clamped;
///
/// assert_eq!(remap_clamped(0.25, 0.0, 1.0, 0.0, 1.0), 0.25);
/// assert_eq!(remap_clamped(0.5, 0.0, 1.0, 0.0, 20000.0), 10000.0);
/// assert_eq!(remap_clamped(3.0, 0.0, 1.0, 0.0, 1.0), 1.0);
/// ```
#[inline]
pub fn remap_clamped(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let span = from_max - from_min;
    let t = if span == 0.0 || value.is_nan() {
        0.0
    } else {
        (value - from_min) / span
    };
    let (lo, hi) = if to_min <= to_max { (to_min, to_max) } else { (to_max, to_min) };
    lerp(to_min, to_max, t).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(1000.0, 44100.0), 44100.0);
        assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);
    }

    #[test]
    fn test_remap_inverted_destination() {
        let v = remap_clamped(0.25, 0.0, 1.0, 1.0, 0.0);
        assert!((v - 0.75).abs() < 1e-6);
        assert_eq!(remap_clamped(2.0, 0.0, 1.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_remap_signed_domain() {
        assert_eq!(remap_clamped(-1.0, -1.0, 1.0, 0.0, 1.0), 0.0);
        assert_eq!(remap_clamped(0.0, -1.0, 1.0, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_remap_nan_maps_to_minimum() {
        assert_eq!(remap_clamped(f32::NAN, 0.0, 1.0, 20.0, 40.0), 20.0);
    }
}
