//! Envelope-scaled output gain.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use tactus_core::{AudioBlock, BlockContext, Effect, GAIN_LEVEL, ParamCell, ParamRegistry, RegistryError};

/// Multiplies every sample by `gainLevel × envelope`.
///
/// Both factors are sampled once per block, so a block is scaled by a
/// single constant.
///
/// ## Parameters
/// - `gainLevel`: linear level, 0.0 to 1.0 (default 0.5)
pub struct Gain {
    level: Arc<ParamCell>,
}

impl Gain {
    /// Stage name used when claiming `gainLevel`.
    pub const NAME: &'static str = "gain";

    /// Creates the stage around an existing cell.
    pub fn new(level: Arc<ParamCell>) -> Self {
        Self { level }
    }

    /// Claims `gainLevel` from the registry.
    pub fn from_registry(registry: &mut ParamRegistry) -> Result<Self, RegistryError> {
        Ok(Self::new(registry.claim(GAIN_LEVEL, Self::NAME)?))
    }

    /// Gain that the next block will be scaled by for the given envelope.
    pub fn block_gain(&self, envelope: f32) -> f32 {
        self.level.get() * envelope
    }
}

impl Effect for Gain {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process_block(&mut self, block: &mut AudioBlock, ctx: &BlockContext) {
        let gain = self.block_gain(ctx.envelope);
        for ch in 0..block.channels() {
            for sample in block.channel_mut(ch) {
                *sample *= gain;
            }
        }
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(value: f32) -> AudioBlock {
        let mut block = AudioBlock::new(2, 8);
        block.channel_mut(0).fill(value);
        block.channel_mut(1).fill(-value);
        block
    }

    #[test]
    fn test_scales_by_level_and_envelope() {
        let mut registry = ParamRegistry::with_defaults();
        let mut gain = Gain::from_registry(&mut registry).unwrap();
        registry.get(GAIN_LEVEL).unwrap().set(0.25);

        let mut block = filled(1.0);
        gain.process_block(&mut block, &BlockContext::new(1.0, 44100.0));
        assert!(block.channel(0).iter().all(|&s| (s - 0.25).abs() < 1e-7));
        assert!(block.channel(1).iter().all(|&s| (s + 0.25).abs() < 1e-7));

        let mut block = filled(1.0);
        gain.process_block(&mut block, &BlockContext::new(0.5, 44100.0));
        assert!(block.channel(0).iter().all(|&s| (s - 0.125).abs() < 1e-7));
    }

    #[test]
    fn test_zero_envelope_silences() {
        let mut registry = ParamRegistry::with_defaults();
        let mut gain = Gain::from_registry(&mut registry).unwrap();
        let mut block = filled(0.8);
        gain.process_block(&mut block, &BlockContext::new(0.0, 44100.0));
        assert_eq!(block.peak(), 0.0);
    }

    #[test]
    fn test_second_claim_fails() {
        let mut registry = ParamRegistry::with_defaults();
        let _first = Gain::from_registry(&mut registry).unwrap();
        assert!(matches!(
            Gain::from_registry(&mut registry),
            Err(RegistryError::AlreadyClaimed { owner: "gain", .. })
        ));
    }
}
