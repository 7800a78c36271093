//! Tactus Platform - touch input and gesture-to-parameter routing
//!
//! This crate turns raw multi-touch events into parameter writes.
//!
//! # Core Abstractions
//!
//! ## Gesture Tracking
//!
//! - [`GestureTracker`] - Per-finger state and derived kinematic features
//! - [`TouchPoint`] / [`FingerId`] - One tracked finger
//! - [`GestureSnapshot`] - Derived features in one value for UI feedback
//! - [`VelocityRolloff`] - Geometric velocity decay after a sustained stroke
//!
//! ## Routing
//!
//! - [`GestureFeature`] - Named scalar read from the tracker (`"y-position"`, ...)
//! - [`ParameterRouter`] - Fixed-capacity table of feature → parameter bindings
//! - [`RebindPolicy`] - Whether a rebound parameter jumps or glides
//!
//! # Threading
//!
//! Everything here runs on the UI thread. The router's only output is
//! [`ParamCell`](tactus_core::ParamCell) writes, which the audio thread reads
//! lock-free.
//!
//! # no_std Support
//!
//! Only `alloc` is needed. Disable the default `std` feature for embedded
//! controllers; enable `tracing` to log binding changes.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub mod feature;
pub mod rolloff;
pub mod router;
pub mod tracker;

pub use error::BindingError;
pub use feature::{FeatureDomain, GestureFeature};
pub use rolloff::VelocityRolloff;
pub use router::{Binding, DEFAULT_VELOCITY_CEILING, ParameterRouter, RebindPolicy};
pub use tracker::{
    FingerId, GestureSnapshot, GestureTracker, PITCH_BUCKETS, Point, TouchPoint, TrackerConfig,
    pitch_bucket,
};
