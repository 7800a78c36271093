//! Gesture-feature to parameter routing.
//!
//! [`ParameterRouter`] is a fixed-capacity binding table. Each binding ties one
//! [`GestureFeature`] to one named parameter; a parameter has at most one
//! binding, while a feature may drive several parameters.
//!
//! Routing is two-phase, matching how the touch handlers drive it:
//!
//! 1. [`route`](ParameterRouter::route) samples every active binding's feature
//!    from the tracker. Bindings whose feature needs more fingers than are down
//!    are skipped; in discrete mode positional features snap to pitch buckets.
//! 2. [`apply`](ParameterRouter::apply) remaps each sampled value from the
//!    feature's domain onto the parameter's `[min, max]` and stores it in the
//!    parameter cell. Values are clamped, never rejected.
//!
//! # Example
//!
//! ```rust
//! use tactus_core::{ParamRegistry, GAIN_LEVEL};
//! use tactus_platform::{FingerId, GestureTracker, ParameterRouter, Point, TrackerConfig};
//!
//! let registry = ParamRegistry::with_defaults();
//! let mut router = ParameterRouter::<8>::new(&registry);
//! router.bind_names("y-position", GAIN_LEVEL).unwrap();
//!
//! let mut tracker = GestureTracker::new(TrackerConfig { width: 100.0, height: 100.0, ..Default::default() });
//! tracker.add_finger(FingerId(0), Point::new(10.0, 25.0));
//!
//! router.route(&tracker, tracker.num_fingers(), false);
//! router.apply();
//! assert_eq!(registry.get(GAIN_LEVEL).unwrap().get(), 0.25);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{string::ToString, sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use tactus_core::{LinearRamp, ParamCell, ParamRegistry, remap_clamped};

use crate::error::BindingError;
use crate::feature::GestureFeature;
use crate::tracker::{GestureTracker, PITCH_BUCKETS, pitch_bucket};

/// How a parameter moves when its binding changes mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebindPolicy {
    /// The next `apply` writes the new feature's value directly.
    #[default]
    Jump,
    /// The parameter ramps linearly from its current value to the new
    /// feature's value over the next `steps` calls to `apply`.
    Glide {
        /// Number of `apply` calls the transition spans.
        steps: u32,
    },
}

/// A (feature, parameter) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Source feature.
    pub feature: GestureFeature,
    /// Target parameter name.
    pub parameter: &'static str,
}

#[derive(Debug, Clone)]
struct BindingSlot {
    binding: Binding,
    cell: Arc<ParamCell>,
    /// Sampled value in the feature's normalized domain, `None` when inactive.
    sampled: Option<f32>,
    glide: Option<LinearRamp>,
}

/// Fixed-capacity table of gesture bindings.
///
/// # Type Parameter
///
/// - `N`: Maximum number of bindings
#[derive(Debug, Clone)]
pub struct ParameterRouter<const N: usize> {
    slots: [Option<BindingSlot>; N],
    count: usize,
    /// Parameters that may be bound, resolved once from the registry.
    targets: Vec<Arc<ParamCell>>,
    policy: RebindPolicy,
    velocity_ceiling: f32,
}

/// Default velocity that maps to the top of a parameter's range.
pub const DEFAULT_VELOCITY_CEILING: f32 = 0.05;

impl<const N: usize> ParameterRouter<N> {
    /// Creates an empty router over the parameters declared in `registry`.
    pub fn new(registry: &ParamRegistry) -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            count: 0,
            targets: registry.iter().cloned().collect(),
            policy: RebindPolicy::Jump,
            velocity_ceiling: DEFAULT_VELOCITY_CEILING,
        }
    }

    /// Sets the rebind policy.
    pub fn with_policy(mut self, policy: RebindPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the velocity that maps to a parameter's maximum.
    pub fn with_velocity_ceiling(mut self, ceiling: f32) -> Self {
        self.velocity_ceiling = ceiling;
        self
    }

    /// Current rebind policy.
    pub fn policy(&self) -> RebindPolicy {
        self.policy
    }

    /// Changes the rebind policy for future bindings.
    pub fn set_policy(&mut self, policy: RebindPolicy) {
        self.policy = policy;
    }

    /// Number of active bindings.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// True if nothing is bound.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of bindings.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Binds `feature` to the parameter named `parameter`.
    ///
    /// Replaces the parameter's existing binding if it has one.
    pub fn bind(&mut self, feature: GestureFeature, parameter: &str) -> Result<(), BindingError> {
        let cell = self
            .targets
            .iter()
            .find(|c| c.name() == parameter)
            .cloned()
            .ok_or_else(|| BindingError::UnknownParameter(parameter.to_string()))?;

        let glide = match self.policy {
            RebindPolicy::Glide { steps } if steps > 0 => {
                let mut ramp = LinearRamp::new(cell.get());
                ramp.start(cell.get(), cell.get(), steps);
                Some(ramp)
            }
            _ => None,
        };

        let binding = Binding {
            feature,
            parameter: cell.name(),
        };

        // Already bound - replace the feature
        for slot in self.slots.iter_mut().flatten() {
            if slot.binding.parameter == binding.parameter {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    parameter = binding.parameter,
                    from = %slot.binding.feature,
                    to = %feature,
                    "binding replaced"
                );
                slot.binding = binding;
                slot.sampled = None;
                slot.glide = glide;
                return Ok(());
            }
        }

        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                *slot = Some(BindingSlot {
                    binding,
                    cell,
                    sampled: None,
                    glide,
                });
                self.count += 1;
                #[cfg(feature = "tracing")]
                tracing::info!(parameter = binding.parameter, feature = %feature, "binding added");
                return Ok(());
            }
        }

        Err(BindingError::RouterFull { capacity: N })
    }

    /// Binds by names, e.g. `("y-position", "gainLevel")`.
    pub fn bind_names(&mut self, feature: &str, parameter: &str) -> Result<(), BindingError> {
        let feature: GestureFeature = feature.parse()?;
        self.bind(feature, parameter)
    }

    /// Removes the binding of `parameter`.
    ///
    /// Returns `true` if a binding was removed. The parameter keeps its last value.
    pub fn unbind(&mut self, parameter: &str) -> bool {
        for slot in self.slots.iter_mut() {
            if let Some(entry) = slot
                && entry.binding.parameter == parameter
            {
                #[cfg(feature = "tracing")]
                tracing::info!(parameter, "binding removed");
                *slot = None;
                self.count -= 1;
                return true;
            }
        }
        false
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.count = 0;
    }

    /// Feature currently bound to `parameter`.
    pub fn binding_for(&self, parameter: &str) -> Option<GestureFeature> {
        self.slots
            .iter()
            .flatten()
            .find(|s| s.binding.parameter == parameter)
            .map(|s| s.binding.feature)
    }

    /// Active bindings in slot order.
    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.slots.iter().flatten().map(|s| s.binding)
    }

    /// Samples every binding's feature from `tracker`.
    ///
    /// Bindings whose feature needs more than `num_fingers` fingers are
    /// inactive until the next call. With `discrete` set, positional features
    /// are quantized to the 12 pitch buckets.
    pub fn route(&mut self, tracker: &GestureTracker, num_fingers: usize, discrete: bool) {
        let ceiling = self.velocity_ceiling;
        for slot in self.slots.iter_mut().flatten() {
            let feature = slot.binding.feature;
            slot.sampled = if num_fingers < feature.min_fingers() {
                None
            } else {
                sample_feature(tracker, feature).map(|raw| {
                    let t = feature.domain(ceiling).normalize(raw);
                    if discrete && feature.is_positional() {
                        f32::from(pitch_bucket(t)) / f32::from(PITCH_BUCKETS - 1)
                    } else {
                        t
                    }
                })
            };
        }
    }

    /// Writes every sampled value into its parameter cell.
    ///
    /// The normalized feature value is remapped onto the parameter's range and
    /// clamped. Parameters that no stage reads simply retain the value.
    pub fn apply(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            let Some(t) = slot.sampled else {
                continue;
            };
            let desc = slot.cell.descriptor();
            let value = remap_clamped(t, 0.0, 1.0, desc.min, desc.max);

            if let Some(ramp) = slot.glide.as_mut() {
                ramp.retarget(value);
                slot.cell.set(ramp.advance());
                if ramp.is_settled() {
                    slot.glide = None;
                }
            } else {
                slot.cell.set(value);
            }
        }
    }
}

/// Reads a feature's raw value; `None` when the feature is undefined right now.
fn sample_feature(tracker: &GestureTracker, feature: GestureFeature) -> Option<f32> {
    match feature {
        GestureFeature::XPosition => tracker.finger_position(0).map(|p| p.x),
        GestureFeature::YPosition => tracker.finger_position(0).map(|p| p.y),
        GestureFeature::Velocity => Some(tracker.velocity()),
        GestureFeature::Distance => Some(tracker.distance()),
        GestureFeature::DirectionX => tracker.direction().map(|d| d.x),
        GestureFeature::DirectionY => tracker.direction().map(|d| d.y),
        GestureFeature::SecondX => tracker.finger_position(1).map(|p| p.x),
        GestureFeature::SecondY => tracker.finger_position(1).map(|p| p.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{FingerId, Point, TrackerConfig};
    use tactus_core::{GAIN_LEVEL, LOWPASS_CUTOFF, PITCH, TEMPO};

    fn tracker() -> GestureTracker {
        GestureTracker::new(TrackerConfig {
            width: 100.0,
            height: 100.0,
            direction_buffer_size: 4,
            tap_radius: 0.02,
        })
    }

    fn value(registry: &ParamRegistry, name: &str) -> f32 {
        registry.get(name).unwrap().get()
    }

    #[test]
    fn test_y_position_to_gain_identity() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, GAIN_LEVEL).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(0.0, 25.0));
        router.route(&t, 1, false);
        router.apply();
        assert_eq!(value(&registry, GAIN_LEVEL), 0.25);
    }

    #[test]
    fn test_affine_remap_to_cutoff() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::XPosition, LOWPASS_CUTOFF).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(50.0, 0.0));
        router.route(&t, 1, false);
        router.apply();
        assert_eq!(value(&registry, LOWPASS_CUTOFF), 10000.0);
    }

    #[test]
    fn test_rebind_replaces_existing_binding() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, PITCH).unwrap();
        router.bind(GestureFeature::XPosition, PITCH).unwrap();
        assert_eq!(router.len(), 1);
        assert_eq!(router.binding_for(PITCH), Some(GestureFeature::XPosition));
    }

    #[test]
    fn test_feature_can_drive_several_parameters() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, PITCH).unwrap();
        router.bind(GestureFeature::YPosition, TEMPO).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(0.0, 80.0));
        router.route(&t, 1, false);
        router.apply();
        assert!((value(&registry, PITCH) - 0.8).abs() < 1e-6);
        assert!((value(&registry, TEMPO) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        assert_eq!(
            router.bind_names("y-position", "resonance"),
            Err(BindingError::UnknownParameter("resonance".to_string()))
        );
        assert!(matches!(
            router.bind_names("tilt", GAIN_LEVEL),
            Err(BindingError::UnknownFeature(_))
        ));
        assert!(router.is_empty());
    }

    #[test]
    fn test_router_full() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<2>::new(&registry);
        router.bind(GestureFeature::XPosition, PITCH).unwrap();
        router.bind(GestureFeature::XPosition, TEMPO).unwrap();
        assert_eq!(
            router.bind(GestureFeature::XPosition, GAIN_LEVEL),
            Err(BindingError::RouterFull { capacity: 2 })
        );
    }

    #[test]
    fn test_unbind_keeps_last_value() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, GAIN_LEVEL).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(0.0, 90.0));
        router.route(&t, 1, false);
        router.apply();
        assert!(router.unbind(GAIN_LEVEL));
        assert!(!router.unbind(GAIN_LEVEL), "second unbind is a no-op");

        t.update_finger(FingerId(0), Point::new(0.0, 10.0));
        router.route(&t, 1, false);
        router.apply();
        assert!((value(&registry, GAIN_LEVEL) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_second_finger_binding_gated_by_finger_count() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::SecondY, TEMPO).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(0.0, 100.0));
        router.route(&t, 1, false);
        router.apply();
        assert_eq!(value(&registry, TEMPO), 0.5, "one finger must not drive second-y");

        t.add_finger(FingerId(1), Point::new(0.0, 20.0));
        router.route(&t, 2, false);
        router.apply();
        assert!((value(&registry, TEMPO) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_discrete_mode_quantizes_positions() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, PITCH).unwrap();

        let mut t = tracker();
        // 0.55 falls in bucket 6 of 12
        t.add_finger(FingerId(0), Point::new(0.0, 55.0));
        router.route(&t, 1, true);
        router.apply();
        assert!((value(&registry, PITCH) - 6.0 / 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_fingers_only_velocity_routes() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry).with_velocity_ceiling(0.1);
        router.bind(GestureFeature::Velocity, GAIN_LEVEL).unwrap();
        router.bind(GestureFeature::XPosition, LOWPASS_CUTOFF).unwrap();

        let mut t = tracker();
        t.override_velocity(0.05);
        router.route(&t, 0, false);
        router.apply();
        assert!((value(&registry, GAIN_LEVEL) - 0.5).abs() < 1e-6);
        assert_eq!(value(&registry, LOWPASS_CUTOFF), 1000.0);
    }

    #[test]
    fn test_glide_policy_ramps_after_rebind() {
        let registry = ParamRegistry::with_defaults();
        let mut router =
            ParameterRouter::<8>::new(&registry).with_policy(RebindPolicy::Glide { steps: 4 });
        router.bind(GestureFeature::YPosition, GAIN_LEVEL).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(100.0, 0.0));
        // gain starts at its 0.5 default; y = 0 glides it down to 0 over 4 applies
        let mut seen = Vec::new();
        for _ in 0..4 {
            router.route(&t, 1, false);
            router.apply();
            seen.push(value(&registry, GAIN_LEVEL));
        }
        assert!((seen[0] - 0.375).abs() < 1e-6, "first step {}", seen[0]);
        assert_eq!(seen[3], 0.0);

        router.bind(GestureFeature::XPosition, GAIN_LEVEL).unwrap();
        router.route(&t, 1, false);
        router.apply();
        let after = value(&registry, GAIN_LEVEL);
        assert!(after <= 0.25 + 1e-6, "rebind jumped to {after}");
    }

    #[test]
    fn test_jump_policy_writes_immediately() {
        let registry = ParamRegistry::with_defaults();
        let mut router = ParameterRouter::<8>::new(&registry);
        router.bind(GestureFeature::YPosition, GAIN_LEVEL).unwrap();

        let mut t = tracker();
        t.add_finger(FingerId(0), Point::new(100.0, 0.0));
        router.route(&t, 1, false);
        router.apply();
        router.bind(GestureFeature::XPosition, GAIN_LEVEL).unwrap();
        router.route(&t, 1, false);
        router.apply();
        assert_eq!(value(&registry, GAIN_LEVEL), 1.0);
    }
}
