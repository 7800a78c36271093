//! Resonant low-pass stage.

#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use tactus_core::{
    AudioBlock, Biquad, BlockContext, Effect, LOWPASS_CUTOFF, ParamCell, ParamRegistry, RegistryError,
    lowpass_coefficients,
};

/// Butterworth Q.
const Q: f32 = 0.707;

/// Lowest cutoff the filter is designed for.
const MIN_CUTOFF_HZ: f32 = 20.0;

/// Biquad low-pass driven by the `lpfc` parameter.
///
/// One filter per channel. Coefficients are recomputed at the top of a block
/// only when the cutoff has moved since the previous block. The cutoff is
/// clamped to `[20 Hz, 0.49 × sample rate]` so a 20 kHz setting stays stable
/// at low sample rates.
///
/// ## Parameters
/// - `lpfc`: cutoff in Hz, 0 to 20000 (default 1000)
pub struct LowPass {
    cutoff: Arc<ParamCell>,
    filters: Vec<Biquad>,
    sample_rate: f32,
    designed_for: f32,
}

impl LowPass {
    /// Stage name used when claiming `lpfc`.
    pub const NAME: &'static str = "lowpass";

    /// Creates the stage for `channels` channels.
    pub fn new(cutoff: Arc<ParamCell>, channels: usize, sample_rate: f32) -> Self {
        let mut stage = Self {
            cutoff,
            filters: vec![Biquad::new(); channels.max(1)],
            sample_rate,
            designed_for: f32::NAN,
        };
        stage.update_coefficients(stage.cutoff.get());
        stage
    }

    /// Claims `lpfc` from the registry.
    pub fn from_registry(
        registry: &mut ParamRegistry,
        channels: usize,
        sample_rate: f32,
    ) -> Result<Self, RegistryError> {
        let cell = registry.claim(LOWPASS_CUTOFF, Self::NAME)?;
        Ok(Self::new(cell, channels, sample_rate))
    }

    /// Cutoff the coefficients were last designed for, after clamping.
    pub fn effective_cutoff(&self) -> f32 {
        self.clamp_cutoff(self.designed_for)
    }

    fn clamp_cutoff(&self, hz: f32) -> f32 {
        hz.clamp(MIN_CUTOFF_HZ, self.sample_rate * 0.49)
    }

    fn update_coefficients(&mut self, requested: f32) {
        let hz = self.clamp_cutoff(requested);
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(hz, Q, self.sample_rate);
        for filter in &mut self.filters {
            filter.set_coefficients(b0, b1, b2, a0, a1, a2);
        }
        self.designed_for = requested;
    }
}

impl Effect for LowPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process_block(&mut self, block: &mut AudioBlock, _ctx: &BlockContext) {
        let requested = self.cutoff.get();
        if requested != self.designed_for {
            self.update_coefficients(requested);
        }
        let channels = block.channels().min(self.filters.len());
        for ch in 0..channels {
            let filter = &mut self.filters[ch];
            for sample in block.channel_mut(ch) {
                *sample = filter.process(*sample);
            }
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coefficients(self.cutoff.get());
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
    }
}
