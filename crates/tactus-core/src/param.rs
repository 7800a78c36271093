//! Parameter storage shared between the UI and audio threads.
//!
//! [`ParamCell`] stores an `f32` as its bit pattern in an [`AtomicU32`], the
//! same lock-free hand-off used by the GUI bridges: the writer clamps and
//! stores with `Release`, the reader loads with `Acquire`. Each cell has one
//! writer (the router) and one reader (the stage that claimed it).
//!
//! [`LinearRamp`] is a constant-rate transition measured in steps rather than
//! samples. The router uses it to glide a parameter after its binding changes.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::param_info::ParamDescriptor;

/// A named, clamped, lock-free scalar.
///
/// ```rust
/// use tactus_core::{ParamCell, ParamDescriptor};
///
/// let cell = ParamCell::new(ParamDescriptor::lowpass_cutoff());
/// assert_eq!(cell.get(), 1000.0);
///
/// cell.set(25_000.0);
/// assert_eq!(cell.get(), 20_000.0);
/// ```
#[derive(Debug)]
pub struct ParamCell {
    bits: AtomicU32,
    descriptor: ParamDescriptor,
}

impl ParamCell {
    /// Creates a cell holding the descriptor's default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            bits: AtomicU32::new(descriptor.default.to_bits()),
            descriptor,
        }
    }

    /// Stores a value, clamped to the declared range.
    #[inline]
    pub fn set(&self, value: f32) {
        let clamped = self.descriptor.clamp(value);
        self.bits.store(clamped.to_bits(), Ordering::Release);
    }

    /// Stores a value given in normalized `[0, 1]` space.
    #[inline]
    pub fn set_normalized(&self, normalized: f32) {
        self.set(self.descriptor.denormalize(normalized));
    }

    /// Loads the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Current value in normalized `[0, 1]` space.
    #[inline]
    pub fn get_normalized(&self) -> f32 {
        self.descriptor.normalize(self.get())
    }

    /// Restores the default value.
    pub fn reset(&self) {
        self.set(self.descriptor.default);
    }

    /// The descriptor this cell was created from.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }

    /// Stable parameter name.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

/// Linear transition from a start value to a target over a fixed number of steps.
///
/// A ramp with zero steps jumps straight to the target.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    increment: f32,
    steps_remaining: u32,
}

impl LinearRamp {
    /// Creates a settled ramp holding `initial`.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            steps_remaining: 0,
        }
    }

    /// Starts a new transition from `from` to `to` lasting `steps` calls to
    /// [`advance`](Self::advance).
    pub fn start(&mut self, from: f32, to: f32, steps: u32) {
        self.target = to;
        if steps == 0 {
            self.current = to;
            self.increment = 0.0;
            self.steps_remaining = 0;
        } else {
            self.current = from;
            self.increment = (to - from) / steps as f32;
            self.steps_remaining = steps;
        }
    }

    /// Moves the target without restarting the step count.
    ///
    /// Used when the destination drifts while a transition is in flight.
    pub fn retarget(&mut self, to: f32) {
        if self.steps_remaining == 0 {
            self.current = to;
            self.target = to;
            return;
        }
        self.target = to;
        self.increment = (to - self.current) / self.steps_remaining as f32;
    }

    /// Advances one step and returns the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.steps_remaining > 0 {
            self.current += self.increment;
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// True once the target has been reached.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps_remaining == 0
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_starts_at_default() {
        let cell = ParamCell::new(ParamDescriptor::gain_level());
        assert_eq!(cell.get(), 0.5);
        assert_eq!(cell.name(), "gainLevel");
    }

    #[test]
    fn test_cell_clamps_out_of_range() {
        let cell = ParamCell::new(ParamDescriptor::gain_level());
        cell.set(-0.3);
        assert_eq!(cell.get(), 0.0);
        cell.set(7.0);
        assert_eq!(cell.get(), 1.0);
    }

    #[test]
    fn test_cell_normalized_roundtrip() {
        let cell = ParamCell::new(ParamDescriptor::lowpass_cutoff());
        cell.set_normalized(0.25);
        assert_eq!(cell.get(), 5000.0);
        assert!((cell.get_normalized() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_cell_reset() {
        let cell = ParamCell::new(ParamDescriptor::lowpass_cutoff());
        cell.set(300.0);
        cell.reset();
        assert_eq!(cell.get(), 1000.0);
    }

    #[test]
    fn test_cell_visible_across_threads() {
        let cell = std::sync::Arc::new(ParamCell::new(ParamDescriptor::pitch()));
        let writer = std::sync::Arc::clone(&cell);
        std::thread::spawn(move || writer.set(0.8)).join().unwrap();
        assert_eq!(cell.get(), 0.8);
    }

    #[test]
    fn test_ramp_reaches_target_in_steps() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.start(0.0, 1.0, 4);
        let values: Vec<f32> = (0..4).map(|_| ramp.advance()).collect();
        assert!((values[0] - 0.25).abs() < 1e-6);
        assert!((values[1] - 0.5).abs() < 1e-6);
        assert_eq!(values[3], 1.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn test_ramp_zero_steps_jumps() {
        let mut ramp = LinearRamp::new(0.2);
        ramp.start(0.2, 0.9, 0);
        assert_eq!(ramp.get(), 0.9);
        assert!(ramp.is_settled());
    }

    #[test]
    fn test_ramp_retarget_keeps_remaining_steps() {
        let mut ramp = LinearRamp::new(0.0);
        ramp.start(0.0, 1.0, 4);
        ramp.advance();
        ramp.retarget(0.25);
        ramp.advance();
        ramp.advance();
        assert_eq!(ramp.advance(), 0.25);
    }
}
