//! Fixed-order processing chain.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use tactus_core::{AudioBlock, BlockContext, Effect, ParamRegistry, RegistryError};

use crate::{Gain, LowPass, TimeStretch};

/// Ordered list of stages applied to every rendered block.
///
/// Stages run in the order they were pushed. The chain is built on the control
/// thread, then moved into the audio engine; it never allocates while
/// processing.
pub struct ProcessorChain {
    stages: Vec<Box<dyn Effect>>,
    sample_rate: f32,
}

impl ProcessorChain {
    /// Creates an empty chain.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: Vec::new(),
            sample_rate,
        }
    }

    /// Builds the instrument chain, gain then stretch then low-pass, claiming
    /// each stage's parameters from `registry`.
    ///
    /// Fails if a parameter is undeclared or already claimed.
    pub fn from_registry(
        registry: &mut ParamRegistry,
        channels: usize,
        sample_rate: f32,
    ) -> Result<Self, RegistryError> {
        let mut chain = Self::new(sample_rate);
        chain.push(Gain::from_registry(registry)?);
        chain.push(TimeStretch::from_registry(registry, channels)?);
        chain.push(LowPass::from_registry(registry, channels, sample_rate)?);
        Ok(chain)
    }

    /// Appends a stage.
    pub fn push(&mut self, mut stage: impl Effect + 'static) {
        stage.set_sample_rate(self.sample_rate);
        self.stages.push(Box::new(stage));
    }

    /// Runs every stage over `block` in order.
    pub fn process(&mut self, block: &mut AudioBlock, ctx: &BlockContext) {
        for stage in &mut self.stages {
            stage.process_block(block, ctx);
        }
    }

    /// Stage names in processing order.
    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|s| s.name())
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sample rate the stages are configured for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Reconfigures every stage for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for stage in &mut self.stages {
            stage.set_sample_rate(sample_rate);
        }
    }

    /// Clears the state of every stage.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Total latency of all stages.
    pub fn latency_samples(&self) -> usize {
        self.stages.iter().map(|s| s.latency_samples()).sum()
    }
}
