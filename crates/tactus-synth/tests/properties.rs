//! Property-based tests for the envelope engine.
//!
//! Random trigger/advance schedules check range, monotonicity per stage and
//! that no schedule leaves an envelope stuck.

use proptest::prelude::*;
use tactus_synth::{Envelope, EnvelopeMode, EnvelopeSettings, EnvelopeState};

const SR: f32 = 8000.0;

#[derive(Debug, Clone)]
enum Step {
    On,
    Off,
    Advance(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::On),
        Just(Step::Off),
        (1usize..400).prop_map(Step::Advance),
    ]
}

fn mode_strategy() -> impl Strategy<Value = EnvelopeMode> {
    prop_oneof![Just(EnvelopeMode::Ar), Just(EnvelopeMode::Adsr)]
}

fn settings_strategy() -> impl Strategy<Value = EnvelopeSettings> {
    (0.0f32..50.0, 0.0f32..50.0, 0.0f32..=1.0, 0.0f32..80.0)
        .prop_map(|(a, d, s, r)| EnvelopeSettings::adsr(a, d, s, r))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Level stays in [0, 1]; it never falls during Attack and never rises
    /// during Decay or Release (observed one sample at a time).
    #[test]
    fn level_bounded_and_monotonic_per_stage(
        mode in mode_strategy(),
        settings in settings_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let mut env = Envelope::new(mode, SR, settings);
        let trigger = env.trigger_handle();

        for step in steps {
            match step {
                Step::On => trigger.note_on(),
                Step::Off => trigger.note_off(),
                Step::Advance(n) => {
                    // First call polls the trigger; the rest step without new events.
                    let mut prev_state = env.state();
                    let mut prev = env.level();
                    for i in 0..n {
                        let level = env.advance(1);
                        prop_assert!((0.0..=1.0).contains(&level), "level {} out of range", level);
                        let state = env.state();
                        if i > 0 && state == prev_state {
                            match state {
                                EnvelopeState::Attack => prop_assert!(level >= prev, "attack fell {} -> {}", prev, level),
                                EnvelopeState::Decay | EnvelopeState::Release => {
                                    prop_assert!(level <= prev, "{:?} rose {} -> {}", state, prev, level);
                                }
                                _ => {}
                            }
                        }
                        prev_state = state;
                        prev = level;
                    }
                }
            }
        }
    }

    /// After a final note-off, any history reaches Idle within the release time.
    #[test]
    fn reaches_idle_after_note_off(
        mode in mode_strategy(),
        settings in settings_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..40),
    ) {
        let mut env = Envelope::new(mode, SR, settings);
        let trigger = env.trigger_handle();

        for step in steps {
            match step {
                Step::On => trigger.note_on(),
                Step::Off => trigger.note_off(),
                Step::Advance(n) => { env.advance(n); }
            }
        }

        trigger.note_off();
        let release_samples = (settings.release_ms * SR / 1000.0).ceil() as usize;

        // One block to observe the gate, then the release itself. A note-on that
        // was still pending adds at most one full attack and decay.
        let attack = (settings.attack_ms * SR / 1000.0).ceil() as usize;
        let decay = (settings.decay_ms * SR / 1000.0).ceil() as usize;
        env.advance(attack + decay + 1);
        env.advance(release_samples + 1);
        prop_assert_eq!(env.state(), EnvelopeState::Idle);
        prop_assert_eq!(env.level(), 0.0);
    }
}
