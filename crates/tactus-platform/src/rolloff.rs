//! Velocity rolloff after a sustained stroke ends.
//!
//! When the last finger lifts in sustained mode, the velocity feature does not
//! drop to zero at once. It decays geometrically on a UI timer until it falls
//! to a floor, so velocity-bound parameters glide out with the release.

/// Geometric velocity decay driven by a periodic tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRolloff {
    factor: f32,
    floor: f32,
    value: f32,
    active: bool,
}

impl VelocityRolloff {
    /// Creates an idle rolloff. `factor` is clamped to `[0, 1)`.
    pub fn new(factor: f32, floor: f32) -> Self {
        Self {
            factor: factor.clamp(0.0, 0.999),
            floor: floor.max(0.0),
            value: 0.0,
            active: false,
        }
    }

    /// Seeds the rolloff from the velocity at release.
    pub fn start(&mut self, velocity: f32) {
        self.value = velocity.max(0.0);
        self.active = self.value > self.floor;
    }

    /// Stops the rolloff without publishing anything.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Decays one step and returns the value to publish.
    ///
    /// The step that reaches the floor is still published; after it the
    /// rolloff goes idle and `tick` returns `None`.
    pub fn tick(&mut self) -> Option<f32> {
        if !self.active {
            return None;
        }
        self.value *= self.factor;
        if self.value <= self.floor {
            self.active = false;
        }
        Some(self.value)
    }

    /// True while ticks still publish values.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last published value.
    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decays_geometrically_to_floor() {
        let mut r = VelocityRolloff::new(0.5, 0.1);
        r.start(1.0);
        assert_eq!(r.tick(), Some(0.5));
        assert_eq!(r.tick(), Some(0.25));
        assert_eq!(r.tick(), Some(0.125));
        assert_eq!(r.tick(), Some(0.0625));
        assert!(!r.is_active());
        assert_eq!(r.tick(), None);
    }

    #[test]
    fn test_start_below_floor_is_idle() {
        let mut r = VelocityRolloff::new(0.9, 0.03);
        r.start(0.01);
        assert_eq!(r.tick(), None);
    }

    #[test]
    fn test_cancel() {
        let mut r = VelocityRolloff::new(0.9, 0.0);
        r.start(1.0);
        r.cancel();
        assert_eq!(r.tick(), None);
    }
}
