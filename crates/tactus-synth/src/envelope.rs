//! AR and ADSR envelope generators clocked by the audio block.
//!
//! Each stage is a linear ramp whose length is fixed in samples when the stage
//! is entered, so a release always completes in exactly the configured release
//! time no matter what level it started from. The envelope polls its
//! [`TriggerHandle`] once per [`advance`](Envelope::advance) call and then
//! steps sample by sample through the block.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use libm::ceilf;
use tactus_core::ms_to_samples;

use crate::trigger::{TriggerCursor, TriggerEvent, TriggerHandle};

/// Envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive, output is zero.
    #[default]
    Idle,
    /// Ramping up toward 1.0.
    Attack,
    /// Ramping down from 1.0 toward the sustain level (ADSR only).
    Decay,
    /// Holding the sustain level while the gate is high (ADSR only).
    Sustain,
    /// Ramping from the current level to zero.
    Release,
}

/// Envelope shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnvelopeMode {
    /// Attack then release, no sustain. Used for impulse gestures.
    Ar,
    /// Attack, decay, sustain, release. Used for sustained gestures.
    Adsr,
}

/// Stage timings. `decay_ms` and `sustain` are ignored in AR mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeSettings {
    /// Attack time in milliseconds.
    pub attack_ms: f32,
    /// Decay time in milliseconds.
    pub decay_ms: f32,
    /// Sustain level in `[0, 1]`.
    pub sustain: f32,
    /// Release time in milliseconds.
    pub release_ms: f32,
}

impl EnvelopeSettings {
    /// Attack-release timings.
    pub fn ar(attack_ms: f32, release_ms: f32) -> Self {
        Self {
            attack_ms,
            decay_ms: 0.0,
            sustain: 1.0,
            release_ms,
        }
    }

    /// Attack-decay-sustain-release timings.
    pub fn adsr(attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) -> Self {
        Self {
            attack_ms,
            decay_ms,
            sustain,
            release_ms,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            attack_ms: self.attack_ms.max(0.0),
            decay_ms: self.decay_ms.max(0.0),
            sustain: self.sustain.clamp(0.0, 1.0),
            release_ms: self.release_ms.max(0.0),
        }
    }
}

/// Sample-clocked AR/ADSR envelope.
///
/// # Example
///
/// ```rust
/// use tactus_synth::{Envelope, EnvelopeMode, EnvelopeSettings, EnvelopeState};
///
/// let mut env = Envelope::new(EnvelopeMode::Adsr, 44100.0, EnvelopeSettings::adsr(20.0, 50.0, 0.6, 100.0));
/// let trigger = env.trigger_handle();
///
/// // UI thread
/// trigger.note_on();
///
/// // Audio thread, once per block
/// let level = env.advance(512);
/// assert!(level > 0.0);
/// assert_eq!(env.state(), EnvelopeState::Attack);
/// ```
#[derive(Debug)]
pub struct Envelope {
    mode: EnvelopeMode,
    state: EnvelopeState,
    level: f32,
    sample_rate: f32,
    settings: EnvelopeSettings,

    /// Per-sample increment of the current stage (signed).
    step: f32,
    /// Samples left in the current stage; zero means "no ramp in flight".
    remaining: u32,
    /// Level the current stage ends on.
    target: f32,

    trigger: Arc<TriggerHandle>,
    cursor: TriggerCursor,
}

impl Envelope {
    /// Creates an idle envelope with its own trigger handle.
    pub fn new(mode: EnvelopeMode, sample_rate: f32, settings: EnvelopeSettings) -> Self {
        Self::with_trigger(mode, sample_rate, settings, Arc::new(TriggerHandle::new()))
    }

    /// Creates an idle envelope driven by an existing trigger handle.
    pub fn with_trigger(
        mode: EnvelopeMode,
        sample_rate: f32,
        settings: EnvelopeSettings,
        trigger: Arc<TriggerHandle>,
    ) -> Self {
        let cursor = TriggerCursor::new(&trigger);
        Self {
            mode,
            state: EnvelopeState::Idle,
            level: 0.0,
            sample_rate: sample_rate.max(1.0),
            settings: settings.sanitized(),
            step: 0.0,
            remaining: 0,
            target: 0.0,
            trigger,
            cursor,
        }
    }

    /// Handle the UI thread uses to start and stop notes.
    pub fn trigger_handle(&self) -> Arc<TriggerHandle> {
        Arc::clone(&self.trigger)
    }

    /// Envelope shape.
    pub fn mode(&self) -> EnvelopeMode {
        self.mode
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True unless idle.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    /// Current stage timings.
    pub fn settings(&self) -> EnvelopeSettings {
        self.settings
    }

    /// Replaces the stage timings. Takes effect at the next stage entry.
    pub fn set_settings(&mut self, settings: EnvelopeSettings) {
        self.settings = settings.sanitized();
    }

    /// Updates the sample rate. Takes effect at the next stage entry.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    /// Forces the envelope to idle at zero.
    ///
    /// Pending note-ons on the handle are discarded.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
        self.step = 0.0;
        self.remaining = 0;
        self.cursor = TriggerCursor::new(&self.trigger);
    }

    /// Polls the trigger and advances by `sample_count` samples.
    ///
    /// Returns the level at the end of the block.
    pub fn advance(&mut self, sample_count: usize) -> f32 {
        match self.cursor.poll(&self.trigger) {
            TriggerEvent::NoteOn => self.enter_attack(),
            TriggerEvent::GateLow => {
                if matches!(
                    self.state,
                    EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain
                ) {
                    self.enter_release();
                }
            }
            TriggerEvent::None => {}
        }

        for _ in 0..sample_count {
            if self.state == EnvelopeState::Idle || self.state == EnvelopeState::Sustain {
                break;
            }
            self.tick();
        }
        self.level
    }

    #[inline]
    fn tick(&mut self) {
        if self.remaining > 0 {
            // Never overshoot the stage target, so the final snap cannot reverse direction.
            let next = self.level + self.step;
            let bounded = if self.step >= 0.0 {
                next.min(self.target)
            } else {
                next.max(self.target)
            };
            self.level = bounded.clamp(0.0, 1.0);
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            self.level = self.target;
            self.finish_stage();
        }
    }

    fn finish_stage(&mut self) {
        match (self.state, self.mode) {
            (EnvelopeState::Attack, EnvelopeMode::Ar) => self.enter_release(),
            (EnvelopeState::Attack, EnvelopeMode::Adsr) => self.enter_decay(),
            (EnvelopeState::Decay, _) => {
                self.state = EnvelopeState::Sustain;
                self.level = self.settings.sustain;
            }
            (EnvelopeState::Release, _) => {
                self.state = EnvelopeState::Idle;
                self.level = 0.0;
            }
            (EnvelopeState::Idle | EnvelopeState::Sustain, _) => {}
        }
    }

    fn enter_attack(&mut self) {
        // Constant rate: a retrigger from a non-zero level takes proportionally less time.
        let full = ms_to_samples(self.settings.attack_ms, self.sample_rate);
        self.enter_stage(EnvelopeState::Attack, 1.0, ceilf((1.0 - self.level) * full));
    }

    fn enter_decay(&mut self) {
        let samples = ms_to_samples(self.settings.decay_ms, self.sample_rate);
        self.enter_stage(EnvelopeState::Decay, self.settings.sustain, ceilf(samples));
    }

    fn enter_release(&mut self) {
        let samples = ms_to_samples(self.settings.release_ms, self.sample_rate);
        self.enter_stage(EnvelopeState::Release, 0.0, ceilf(samples));
    }

    fn enter_stage(&mut self, state: EnvelopeState, target: f32, samples: f32) {
        self.state = state;
        self.target = target;
        let samples = samples.max(0.0) as u32;
        if samples == 0 {
            self.remaining = 0;
            self.step = 0.0;
            self.level = target;
            self.finish_stage();
        } else {
            self.remaining = samples;
            self.step = (target - self.level) / samples as f32;
        }
    }
}
