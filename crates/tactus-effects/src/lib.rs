//! Tactus Effects - the stages of the instrument's processing chain
//!
//! Every stage implements [`tactus_core::Effect`] and reads its controls from
//! [`ParamCell`](tactus_core::ParamCell)s claimed out of a
//! [`ParamRegistry`](tactus_core::ParamRegistry):
//!
//! - [`Gain`] - `gainLevel` scaled by the envelope amplitude
//! - [`TimeStretch`] - granular pitch shift with independent tempo (`pitch`, `tempo`)
//! - [`LowPass`] - Butterworth low-pass at `lpfc`
//!
//! [`ProcessorChain`] wires them in that order.
//!
//! ## Example
//!
//! ```rust
//! use tactus_core::{AudioBlock, BlockContext, ParamRegistry, GAIN_LEVEL};
//! use tactus_effects::ProcessorChain;
//!
//! let mut registry = ParamRegistry::with_defaults();
//! let mut chain = ProcessorChain::from_registry(&mut registry, 2, 44100.0).unwrap();
//! registry.get(GAIN_LEVEL).unwrap().set(0.8);
//!
//! let mut block = AudioBlock::new(2, 512);
//! chain.process(&mut block, &BlockContext::new(1.0, 44100.0));
//! ```
//!
//! ## no_std
//!
//! The stages allocate only at construction and need `alloc` alone; build
//! with `default-features = false` for targets without `std`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chain;
pub mod gain;
pub mod lowpass;
pub mod stretch;

pub use chain::ProcessorChain;
pub use gain::Gain;
pub use lowpass::LowPass;
pub use stretch::{GRAIN, TimeStretch, control_to_ratio};
