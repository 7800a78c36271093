//! Explicit construction of the whole instrument.

use std::sync::Arc;

use tactus_config::{ConfigError, InstrumentConfig};
use tactus_core::ParamRegistry;
use tactus_effects::ProcessorChain;
use tactus_platform::{GestureTracker, ParameterRouter, RebindPolicy, VelocityRolloff};
use tactus_synth::{Envelope, EnvelopeMode};

use crate::Result;
use crate::capture::CaptureSink;
use crate::engine::RealtimeEngine;
use crate::record::RecordBuffer;
use crate::surface::ControlSurface;
use crate::transport::Transport;

/// The three thread-owned halves of one instrument.
///
/// Nothing here is global: build a context, then move each half to the
/// thread that drives it.
///
/// ```rust
/// use tactus_config::InstrumentConfig;
/// use tactus_io::EngineContext;
///
/// let ctx = EngineContext::build(&InstrumentConfig::default()).unwrap();
/// let (surface, engine, capture) = ctx.into_parts();
/// # drop((surface, engine, capture));
/// ```
pub struct EngineContext {
    /// UI thread.
    pub surface: ControlSurface,
    /// Audio output callback.
    pub engine: RealtimeEngine,
    /// Audio input callback.
    pub capture: CaptureSink,
}

impl EngineContext {
    /// Builds every component from `config`, with the recording buffer sized
    /// by `audio.max_record_seconds`.
    pub fn build(config: &InstrumentConfig) -> Result<Self> {
        Self::with_capacity(config, config.audio.capacity_frames())
    }

    /// Builds every component with an explicit recording capacity in frames.
    ///
    /// Fails if the configuration is invalid, a stage's parameter is missing
    /// or claimed twice, or an initial binding cannot be made.
    pub fn with_capacity(config: &InstrumentConfig, capacity_frames: usize) -> Result<Self> {
        config.validate().map_err(ConfigError::from)?;

        let audio = &config.audio;
        let sample_rate = audio.sample_rate as f32;
        let channels = usize::from(audio.channels);

        let mut registry = ParamRegistry::with_defaults();
        let chain = ProcessorChain::from_registry(&mut registry, channels, sample_rate)?;

        let mut router = ParameterRouter::new(&registry)
            .with_policy(RebindPolicy::from(config.routing.rebind))
            .with_velocity_ceiling(config.gesture.velocity_ceiling);
        for binding in &config.routing.bindings {
            router.bind_names(&binding.feature, &binding.parameter)?;
        }

        let ar = Envelope::new(EnvelopeMode::Ar, sample_rate, config.envelope.ar.settings());
        let adsr = Envelope::new(EnvelopeMode::Adsr, sample_rate, config.envelope.adsr.settings());
        let transport = Arc::new(Transport::default());
        let buffer = Arc::new(RecordBuffer::new(channels, capacity_frames, audio.capture_mode));

        let mut surface = ControlSurface::new(
            GestureTracker::new(config.tracker_config()),
            router,
            registry,
            ar.trigger_handle(),
            adsr.trigger_handle(),
            Arc::clone(&transport),
            Arc::clone(&buffer),
            VelocityRolloff::new(config.gesture.rolloff_factor, config.gesture.rolloff_floor),
        );
        surface.set_space(config.mode.space);
        surface.set_discrete(config.mode.discrete_pitch);

        let engine = RealtimeEngine::new(
            Arc::clone(&buffer),
            Arc::clone(&transport),
            chain,
            ar,
            adsr,
            channels,
            audio.block_size,
        );
        let capture = CaptureSink::new(buffer, transport);

        tracing::info!(
            sample_rate = audio.sample_rate,
            channels,
            block_size = audio.block_size,
            capacity_frames,
            capture_mode = ?audio.capture_mode,
            "engine context built"
        );

        Ok(Self {
            surface,
            engine,
            capture,
        })
    }

    /// Splits into (UI, output, input) halves.
    pub fn into_parts(self) -> (ControlSurface, RealtimeEngine, CaptureSink) {
        (self.surface, self.engine, self.capture)
    }
}
