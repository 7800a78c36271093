//! Tactus Synth - envelope engine for the gesture instrument
//!
//! Two envelope shapes drive the instrument's amplitude:
//!
//! - [`EnvelopeMode::Adsr`] for sustained gestures, holding while a finger is down
//! - [`EnvelopeMode::Ar`] for impulse gestures, releasing as soon as the peak is hit
//!
//! Both are [`Envelope`] instances advanced once per audio block. Note-on and
//! note-off arrive from the UI thread through a [`TriggerHandle`], which
//! carries a gate level and a note-on generation counter so that a tap shorter
//! than one block is never lost.
//!
//! ```rust
//! use tactus_synth::{Envelope, EnvelopeMode, EnvelopeSettings};
//!
//! let mut ar = Envelope::new(EnvelopeMode::Ar, 44100.0, EnvelopeSettings::ar(5.0, 250.0));
//! let trigger = ar.trigger_handle();
//!
//! trigger.note_on();
//! trigger.note_off();
//!
//! // The tap still produces an attack on the next block.
//! assert!(ar.advance(128) > 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod envelope;
pub mod trigger;

pub use envelope::{Envelope, EnvelopeMode, EnvelopeSettings, EnvelopeState};
pub use trigger::{TriggerEvent, TriggerHandle};
