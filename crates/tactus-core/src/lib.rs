//! Tactus Core - parameter plumbing and DSP primitives for the gesture instrument
//!
//! This crate holds the pieces shared by the UI thread and the audio thread:
//! named parameter cells that can be written lock-free from gesture handling and
//! read once per block by the effect stages, plus the small DSP building blocks
//! those stages are made of.
//!
//! # Core Abstractions
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Name, unit, range and default of one scalar parameter
//! - [`ParamCell`] - Lock-free clamped `f32` value shared across threads
//! - [`ParamRegistry`] - Stable name → cell map with single-owner claiming
//! - [`LinearRamp`] - Fixed-step linear transition between two values
//!
//! ## Processing
//!
//! - [`AudioBlock`] - Planar, preallocated multi-channel block
//! - [`Effect`] - Object-safe trait for the block-rate effect stages
//! - [`BlockContext`] - Per-block values handed to every stage (envelope, rate)
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//!
//! # no_std Support
//!
//! The crate only needs `alloc`. Disable the default `std` feature to use it
//! on embedded targets:
//!
//! ```toml
//! [dependencies]
//! tactus-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tactus_core::{ParamRegistry, GAIN_LEVEL};
//!
//! let mut registry = ParamRegistry::with_defaults();
//! let gain = registry.claim(GAIN_LEVEL, "gain").unwrap();
//!
//! // UI thread writes, values are clamped to the declared range
//! gain.set(1.7);
//! assert_eq!(gain.get(), 1.0);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations or locks on the audio path
//! - **Single owner**: Every parameter is claimed by exactly one stage
//! - **Clamp, never reject**: Out-of-range writes saturate to the bounds

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod block;
pub mod effect;
pub mod math;
pub mod param;
pub mod param_info;
pub mod registry;

pub use biquad::{Biquad, lowpass_coefficients};
pub use block::AudioBlock;
pub use effect::{BlockContext, Effect};
pub use math::{flush_denormal, lerp, ms_to_samples, remap_clamped};
pub use param::{LinearRamp, ParamCell};
pub use param_info::{ParamDescriptor, ParamUnit};
pub use registry::{
    GAIN_LEVEL, LOWPASS_CUTOFF, PITCH, ParamRegistry, RegistryError, TEMPO,
};
