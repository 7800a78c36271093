//! Property-based tests for the processing chain.

use proptest::prelude::*;
use tactus_core::{AudioBlock, BlockContext, GAIN_LEVEL, LOWPASS_CUTOFF, PITCH, ParamRegistry, TEMPO};
use tactus_effects::ProcessorChain;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any parameter setting keeps bounded input bounded and finite.
    #[test]
    fn chain_output_is_finite(
        gain in 0.0f32..1.0,
        pitch in 0.0f32..1.0,
        tempo in 0.0f32..1.0,
        cutoff in 0.0f32..20000.0,
        envelope in 0.0f32..1.0,
        seed in 0u32..1000,
    ) {
        let mut registry = ParamRegistry::with_defaults();
        let mut chain = ProcessorChain::from_registry(&mut registry, 2, 44100.0).unwrap();
        registry.get(GAIN_LEVEL).unwrap().set(gain);
        registry.get(PITCH).unwrap().set(pitch);
        registry.get(TEMPO).unwrap().set(tempo);
        registry.get(LOWPASS_CUTOFF).unwrap().set(cutoff);

        let mut block = AudioBlock::new(2, 256);
        let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
        for _ in 0..12 {
            block.set_len(256);
            for ch in 0..2 {
                for s in block.channel_mut(ch) {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    *s = (state as f32 / u32::MAX as f32) * 2.0 - 1.0;
                }
            }
            chain.process(&mut block, &BlockContext::new(envelope, 44100.0));
            for ch in 0..2 {
                prop_assert!(block.channel(ch).iter().all(|s| s.is_finite() && s.abs() < 4.0));
            }
        }
    }

    /// A silent envelope silences the whole chain regardless of settings.
    #[test]
    fn zero_envelope_is_silent(pitch in 0.0f32..1.0, cutoff in 0.0f32..20000.0) {
        let mut registry = ParamRegistry::with_defaults();
        let mut chain = ProcessorChain::from_registry(&mut registry, 1, 44100.0).unwrap();
        registry.get(PITCH).unwrap().set(pitch);
        registry.get(LOWPASS_CUTOFF).unwrap().set(cutoff);

        let mut block = AudioBlock::new(1, 128);
        for _ in 0..8 {
            block.set_len(128);
            block.channel_mut(0).fill(0.9);
            chain.process(&mut block, &BlockContext::new(0.0, 44100.0));
            prop_assert_eq!(block.peak(), 0.0);
        }
    }
}
