//! Multi-touch gesture tracking.
//!
//! [`GestureTracker`] keeps one [`TouchPoint`] per active finger and derives
//! the kinematic features the router samples: velocity of the primary finger,
//! distance of the newest finger from the origin, stroke direction, and the
//! discrete pitch bucket.
//!
//! Positions arrive in component coordinates (`[0, width] × [0, height]`) and
//! are stored normalized to `[0, 1]`. The y axis is not flipped: `y = 0` is the
//! top edge.
//!
//! ## Direction
//!
//! The primary finger's recent positions go into a fixed-size rolling buffer.
//! Each time the write cursor wraps, the direction becomes the normalized
//! vector from the buffer's first sample to its last. The first primary
//! update of a new stroke only reseeds the whole buffer with its position;
//! direction is reported once the following updates have filled it again.
//!
//! ## Invalid identities
//!
//! Touch hardware delivers events out of order. Adding a finger that is
//! already tracked, or updating or removing one that is not, is a no-op.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Stable per-finger identifier assigned by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerId(pub u32);

/// A 2D point or vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        libm::hypotf(self.x, self.y)
    }

    /// Component-wise difference `self - other`.
    #[inline]
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }
}

/// One tracked finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Finger identity.
    pub id: FingerId,
    /// Current normalized position.
    pub position: Point,
    /// Normalized position at touch-down.
    pub down_position: Point,
}

/// Tracker sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Component width in input coordinates.
    pub width: f32,
    /// Component height in input coordinates.
    pub height: f32,
    /// Number of positions in the direction buffer (at least 2).
    pub direction_buffer_size: usize,
    /// Largest distance between stroke start and end that still counts as a tap.
    pub tap_radius: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            direction_buffer_size: 8,
            tap_radius: 0.02,
        }
    }
}

/// Derived gesture state, recomputed on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSnapshot {
    /// Number of tracked fingers.
    pub num_fingers: usize,
    /// Primary finger speed.
    pub velocity: f32,
    /// Running maximum of `velocity` since the caller last cleared it.
    pub velocity_max: f32,
    /// Distance of the newest finger from the origin, `[0, 1]`.
    pub distance: f32,
    /// Stroke direction, once the rolling buffer has filled.
    pub direction: Option<Point>,
    /// Pitch bucket of the primary finger, `0..=11`.
    pub discrete_pitch: u8,
    /// Primary finger position, if any finger is down.
    pub primary: Option<Point>,
}

/// Number of discrete pitch buckets spanning the component height.
pub const PITCH_BUCKETS: u8 = 12;

/// Maps a normalized coordinate to one of [`PITCH_BUCKETS`] buckets.
///
/// ```rust
/// use tactus_platform::pitch_bucket;
///
/// assert_eq!(pitch_bucket(0.0), 0);
/// assert_eq!(pitch_bucket(0.5), 6);
/// assert_eq!(pitch_bucket(1.0), 11);
/// ```
#[inline]
pub fn pitch_bucket(normalized: f32) -> u8 {
    let scaled = libm::floorf(normalized.clamp(0.0, 1.0) * f32::from(PITCH_BUCKETS));
    (scaled as u8).min(PITCH_BUCKETS - 1)
}

/// Per-finger state and derived features.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: TrackerConfig,
    fingers: Vec<TouchPoint>,

    velocity: f32,
    velocity_max: f32,
    /// Last position fed to the velocity computation.
    velocity_origin: Option<Point>,
    distance: f32,

    direction_buffer: Vec<Point>,
    direction_cursor: usize,
    direction: Option<Point>,
    swipe_end: bool,

    last_primary: Point,
    stroke_start: Point,
    last_stroke_was_tap: bool,
}

impl GestureTracker {
    /// Creates an empty tracker.
    pub fn new(config: TrackerConfig) -> Self {
        let size = config.direction_buffer_size.max(2);
        Self {
            config: TrackerConfig {
                direction_buffer_size: size,
                ..config
            },
            fingers: Vec::with_capacity(10),
            velocity: 0.0,
            velocity_max: 0.0,
            velocity_origin: None,
            distance: 0.0,
            direction_buffer: vec![Point::default(); size],
            direction_cursor: 0,
            direction: None,
            swipe_end: true,
            last_primary: Point::default(),
            stroke_start: Point::default(),
            last_stroke_was_tap: false,
        }
    }

    /// Tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Updates the component size used for normalization.
    pub fn set_component_size(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
    }

    /// Starts tracking a finger at `position` (component coordinates).
    ///
    /// No-op if `id` is already tracked.
    pub fn add_finger(&mut self, id: FingerId, position: Point) {
        if self.index_of(id).is_some() {
            return;
        }
        let pos = self.normalize(position);
        let first_of_stroke = self.fingers.is_empty();
        self.fingers.push(TouchPoint {
            id,
            position: pos,
            down_position: pos,
        });

        if first_of_stroke {
            self.velocity_origin = Some(pos);
            self.stroke_start = pos;
            self.last_primary = pos;
        }
        self.distance = distance_from_origin(pos);
    }

    /// Moves a tracked finger to `position` (component coordinates).
    ///
    /// No-op if `id` is unknown. Moving the primary finger also updates the
    /// velocity and feeds the direction buffer. While a stroke reset is
    /// pending the position reseeds the buffer instead of filling a slot.
    pub fn update_finger(&mut self, id: FingerId, position: Point) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let pos = self.normalize(position);
        self.fingers[index].position = pos;

        if index == 0 {
            self.set_velocity(pos.x, pos.y);
            if self.swipe_end {
                self.reseed_direction(pos);
            } else {
                self.push_direction_sample(pos);
            }
            self.last_primary = pos;
        }

        if let Some(newest) = self.fingers.last() {
            self.distance = distance_from_origin(newest.position);
        }
    }

    /// Stops tracking a finger.
    ///
    /// Returns `true` when no fingers remain. Releasing the last finger forces
    /// a stroke reset so the next stroke starts with a fresh direction buffer,
    /// and classifies the finished stroke as a tap or a swipe.
    pub fn remove_finger(&mut self, id: FingerId) -> bool {
        let Some(index) = self.index_of(id) else {
            return self.fingers.is_empty();
        };
        self.fingers.remove(index);

        if let Some(primary) = self.fingers.first() {
            // The next finger takes over; don't count the jump as movement.
            self.velocity_origin = Some(primary.position);
            self.last_primary = primary.position;
            false
        } else {
            self.swipe_end = true;
            self.direction = None;
            self.velocity_origin = None;
            self.last_stroke_was_tap =
                self.last_primary.sub(self.stroke_start).length() < self.config.tap_radius;
            true
        }
    }

    /// Feeds a new primary position (normalized) to the velocity tracker.
    ///
    /// Velocity is the Euclidean distance from the previous position; the
    /// running maximum is updated alongside.
    pub fn set_velocity(&mut self, x: f32, y: f32) {
        let pos = Point::new(x, y);
        let velocity = self.velocity_origin.map_or(0.0, |prev| pos.sub(prev).length());
        self.velocity_origin = Some(pos);
        self.override_velocity(velocity);
    }

    /// Publishes a velocity value directly, e.g. from a release rolloff.
    pub fn override_velocity(&mut self, velocity: f32) {
        let velocity = if velocity.is_finite() { velocity.max(0.0) } else { 0.0 };
        self.velocity = velocity;
        self.velocity_max = self.velocity_max.max(velocity);
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Running maximum velocity.
    pub fn velocity_max(&self) -> f32 {
        self.velocity_max
    }

    /// Clears the running maximum velocity.
    pub fn clear_velocity_max(&mut self) {
        self.velocity_max = 0.0;
    }

    /// Distance of the most recently added finger from the origin, `[0, 1]`.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Stroke direction; `None` until the buffer has filled since the last reset.
    pub fn direction(&self) -> Option<Point> {
        self.direction
    }

    /// Pitch bucket (`0..=11`) of the primary finger's vertical position.
    ///
    /// Uses the last known primary position when no finger is down.
    pub fn discrete_pitch(&self) -> u8 {
        pitch_bucket(self.last_primary.y)
    }

    /// Number of tracked fingers.
    pub fn num_fingers(&self) -> usize {
        self.fingers.len()
    }

    /// Tracked fingers, primary first.
    pub fn fingers(&self) -> &[TouchPoint] {
        &self.fingers
    }

    /// Normalized position of the `index`-th finger.
    pub fn finger_position(&self, index: usize) -> Option<Point> {
        self.fingers.get(index).map(|f| f.position)
    }

    /// Last position of the primary finger, kept after release.
    pub fn last_primary_position(&self) -> Point {
        self.last_primary
    }

    /// True when the last finished stroke stayed within the tap radius.
    pub fn last_stroke_was_tap(&self) -> bool {
        self.last_stroke_was_tap
    }

    /// True until the first primary update of a new stroke reseeds the
    /// direction buffer.
    pub fn stroke_reset_pending(&self) -> bool {
        self.swipe_end
    }

    /// Derived features in one value.
    pub fn snapshot(&self) -> GestureSnapshot {
        GestureSnapshot {
            num_fingers: self.fingers.len(),
            velocity: self.velocity,
            velocity_max: self.velocity_max,
            distance: self.distance,
            direction: self.direction,
            discrete_pitch: self.discrete_pitch(),
            primary: self.finger_position(0),
        }
    }

    /// True when `id` is currently tracked.
    pub fn is_tracked(&self, id: FingerId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: FingerId) -> Option<usize> {
        self.fingers.iter().position(|f| f.id == id)
    }

    fn normalize(&self, position: Point) -> Point {
        let nx = if self.config.width > 0.0 { position.x / self.config.width } else { 0.0 };
        let ny = if self.config.height > 0.0 { position.y / self.config.height } else { 0.0 };
        Point::new(clamp_unit(nx), clamp_unit(ny))
    }

    fn reseed_direction(&mut self, pos: Point) {
        self.direction_buffer.fill(pos);
        self.direction_cursor = 0;
        self.direction = None;
        self.swipe_end = false;
    }

    fn push_direction_sample(&mut self, pos: Point) {
        let size = self.direction_buffer.len();
        self.direction_buffer[self.direction_cursor] = pos;
        self.direction_cursor += 1;
        if self.direction_cursor == size {
            self.direction_cursor = 0;
            let delta = self.direction_buffer[size - 1].sub(self.direction_buffer[0]);
            // A stationary finger keeps the previous direction.
            if let Some(dir) = delta.normalized() {
                self.direction = Some(dir);
            } else if self.direction.is_none() {
                self.direction = Some(Point::default());
            }
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn distance_from_origin(pos: Point) -> f32 {
    (pos.length() / core::f32::consts::SQRT_2).min(1.0)
}
