//! Block-rate effect trait.
//!
//! Stages read their parameter cells once at the top of
//! [`Effect::process_block`]; there is no per-sample parameter interpolation.
//! The only per-block value shared by every stage is the envelope amplitude,
//! passed through [`BlockContext`].

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::block::AudioBlock;

/// Values that are constant for the duration of one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockContext {
    /// Envelope amplitude in `[0, 1]` sampled at the start of the block.
    pub envelope: f32,
    /// Sample rate in Hz.
    pub sample_rate: f32,
}

impl BlockContext {
    /// Context with the given envelope level.
    pub fn new(envelope: f32, sample_rate: f32) -> Self {
        Self {
            envelope: envelope.clamp(0.0, 1.0),
            sample_rate,
        }
    }
}

impl Default for BlockContext {
    fn default() -> Self {
        Self::new(1.0, 44100.0)
    }
}

/// An effect stage of the processing chain.
///
/// ## Contract
///
/// - `process_block` transforms the active region of `block` in place and
///   must not change its channel count or length.
/// - `process_block` must be allocation-free and bounded; all scratch memory is
///   sized in the constructor or in [`set_sample_rate`](Effect::set_sample_rate).
/// - Implementations are `Send` so the chain can move to the audio thread.
pub trait Effect: Send {
    /// Stage name used when claiming parameters and in logs.
    fn name(&self) -> &'static str;

    /// Processes the active region of `block` in place.
    fn process_block(&mut self, block: &mut AudioBlock, ctx: &BlockContext);

    /// Updates the sample rate. Not called from the audio thread.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clears internal state (filter memories, delay lines).
    fn reset(&mut self);

    /// Added latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

impl<T: Effect + ?Sized> Effect for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn process_block(&mut self, block: &mut AudioBlock, ctx: &BlockContext) {
        (**self).process_block(block, ctx);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        (**self).set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Halve;

    impl Effect for Halve {
        fn name(&self) -> &'static str {
            "halve"
        }

        fn process_block(&mut self, block: &mut AudioBlock, _ctx: &BlockContext) {
            for ch in 0..block.channels() {
                for s in block.channel_mut(ch) {
                    *s *= 0.5;
                }
            }
        }

        fn set_sample_rate(&mut self, _sample_rate: f32) {}

        fn reset(&mut self) {}
    }

    #[test]
    fn test_boxed_effect_dispatch() {
        let mut effect: Box<dyn Effect> = Box::new(Halve);
        let mut block = AudioBlock::new(1, 4);
        block.channel_mut(0).fill(1.0);
        effect.process_block(&mut block, &BlockContext::default());
        assert_eq!(block.channel(0), &[0.5; 4]);
        assert_eq!(effect.name(), "halve");
        assert_eq!(effect.latency_samples(), 0);
    }

    #[test]
    fn test_context_clamps_envelope() {
        assert_eq!(BlockContext::new(1.5, 48000.0).envelope, 1.0);
        assert_eq!(BlockContext::new(-0.1, 48000.0).envelope, 0.0);
    }
}
