//! Property-based tests for tactus-core parameter primitives.
//!
//! Tests clamping, remap bounds and filter stability using proptest for
//! randomized input generation.

use proptest::prelude::*;
use tactus_core::{
    Biquad, ParamCell, ParamDescriptor, ParamRegistry, lowpass_coefficients, remap_clamped,
};

fn descriptors() -> [ParamDescriptor; 4] {
    [
        ParamDescriptor::gain_level(),
        ParamDescriptor::pitch(),
        ParamDescriptor::tempo(),
        ParamDescriptor::lowpass_cutoff(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Whatever is written, a cell always holds a value inside its range.
    #[test]
    fn cell_value_always_in_range(
        index in 0usize..4,
        value in prop::num::f32::ANY,
    ) {
        let desc = descriptors()[index];
        let cell = ParamCell::new(desc);
        cell.set(value);
        let v = cell.get();
        prop_assert!(
            v >= desc.min && v <= desc.max,
            "{} held {} after writing {}", desc.name, v, value
        );
    }

    /// Remapping any value inside a source domain lands inside the
    /// destination range, for either destination orientation.
    #[test]
    fn remap_stays_in_destination(
        from_min in -10.0f32..10.0,
        from_span in 0.01f32..100.0,
        t in 0.0f32..=1.0,
        to_a in -1000.0f32..1000.0,
        to_b in -1000.0f32..1000.0,
    ) {
        let from_max = from_min + from_span;
        let value = from_min + t * from_span;
        let out = remap_clamped(value, from_min, from_max, to_a, to_b);
        let (lo, hi) = if to_a <= to_b { (to_a, to_b) } else { (to_b, to_a) };
        prop_assert!(out >= lo && out <= hi, "{} outside [{}, {}]", out, lo, hi);
    }

    /// For any valid cutoff the low-pass stays finite on bounded input.
    #[test]
    fn lowpass_stability(
        freq in 20.0f32..21600.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(freq, 0.707, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        for _ in 0..32 {
            for &sample in &input {
                let out = biquad.process(sample);
                prop_assert!(out.is_finite(), "non-finite output at {} Hz", freq);
            }
        }
    }

    /// Registry cells written through any handle are observed by all handles.
    #[test]
    fn registry_handles_share_state(value in 0.0f32..=1.0) {
        let mut registry = ParamRegistry::with_defaults();
        let claimed = registry.claim(tactus_core::TEMPO, "stretch").unwrap();
        registry.get(tactus_core::TEMPO).unwrap().set(value);
        prop_assert_eq!(claimed.get(), value);
    }
}
