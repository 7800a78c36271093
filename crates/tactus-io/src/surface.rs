//! UI-thread half of the instrument.
//!
//! [`ControlSurface`] receives touch events in component coordinates, keeps
//! the gesture tracker and router up to date, fires the envelope triggers and
//! requests playback. It never touches audio; everything it shares with the
//! render and capture threads is an atomic.

use std::sync::Arc;

use tactus_config::Space;
use tactus_core::ParamRegistry;
use tactus_platform::{
    BindingError, FingerId, GestureFeature, GestureTracker, ParameterRouter, Point, RebindPolicy,
    VelocityRolloff,
};
use tactus_synth::TriggerHandle;

use crate::record::RecordBuffer;
use crate::transport::Transport;

/// Router capacity used by the surface.
pub const ROUTER_CAPACITY: usize = tactus_config::MAX_BINDINGS;

/// Everything a UI layer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSnapshot {
    /// Envelope amplitude published by the renderer.
    pub amplitude: f32,
    /// Current velocity (normalized units per update).
    pub velocity: f32,
    /// Peak velocity of the current stroke.
    pub velocity_max: f32,
    /// Primary finger position, normalized, if a finger is down.
    pub primary: Option<Point>,
    /// Direction of the primary finger, once the buffer has filled.
    pub direction: Option<Point>,
    /// Discrete pitch bucket of the primary finger.
    pub discrete_pitch: u8,
    /// Fingers currently down.
    pub num_fingers: usize,
    /// True while the renderer is playing.
    pub playing: bool,
    /// Renderer read cursor in frames.
    pub read_index: usize,
    /// Frames recorded so far.
    pub recorded_frames: usize,
    /// True once single-take capture has filled the buffer.
    pub buffer_full: bool,
    /// Active space.
    pub space: Space,
    /// True when positional features snap to pitch buckets.
    pub discrete: bool,
}

/// Gesture front end: tracker, router, triggers and transport requests.
pub struct ControlSurface {
    tracker: GestureTracker,
    router: ParameterRouter<ROUTER_CAPACITY>,
    registry: ParamRegistry,
    ar_trigger: Arc<TriggerHandle>,
    adsr_trigger: Arc<TriggerHandle>,
    transport: Arc<Transport>,
    buffer: Arc<RecordBuffer>,
    rolloff: VelocityRolloff,
    space: Space,
    discrete: bool,
    was_playing: bool,
    full_reported: bool,
}

impl ControlSurface {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tracker: GestureTracker,
        router: ParameterRouter<ROUTER_CAPACITY>,
        registry: ParamRegistry,
        ar_trigger: Arc<TriggerHandle>,
        adsr_trigger: Arc<TriggerHandle>,
        transport: Arc<Transport>,
        buffer: Arc<RecordBuffer>,
        rolloff: VelocityRolloff,
    ) -> Self {
        Self {
            tracker,
            router,
            registry,
            ar_trigger,
            adsr_trigger,
            transport,
            buffer,
            rolloff,
            space: Space::Sustained,
            discrete: false,
            was_playing: false,
            full_reported: false,
        }
    }

    /// A finger touched down.
    ///
    /// Tracks it, runs the move path, fires the envelope of the active space
    /// and requests playback from the start of the recording.
    pub fn touch_down(&mut self, id: u32, x: f32, y: f32) {
        self.rolloff.cancel();
        if self.tracker.num_fingers() == 0 {
            self.tracker.clear_velocity_max();
        }
        self.tracker.add_finger(FingerId(id), Point::new(x, y));
        self.touch_move(id, x, y);

        match self.space {
            Space::Sustained => self.adsr_trigger.note_on(),
            Space::Impulse => self.ar_trigger.note_on(),
        }
        self.transport.request_start();
    }

    /// A tracked finger moved. Unknown ids are ignored.
    pub fn touch_move(&mut self, id: u32, x: f32, y: f32) {
        self.tracker.update_finger(FingerId(id), Point::new(x, y));
        let discrete = self.discrete && self.space == Space::Sustained;
        self.router.route(&self.tracker, self.tracker.num_fingers(), discrete);
        self.router.apply();
    }

    /// A finger lifted. Returns `true` once no fingers remain.
    ///
    /// The last finger up releases both envelopes; in sustained space it also
    /// seeds the velocity rolloff from the release velocity. While other
    /// fingers stay down they keep driving velocity, so no rolloff starts.
    /// Unknown ids are ignored and return `false`.
    pub fn touch_up(&mut self, id: u32, x: f32, y: f32) -> bool {
        if !self.tracker.is_tracked(FingerId(id)) {
            return false;
        }
        self.tracker.update_finger(FingerId(id), Point::new(x, y));
        let velocity = self.tracker.velocity();
        let all_released = self.tracker.remove_finger(FingerId(id));
        if all_released {
            self.ar_trigger.note_off();
            self.adsr_trigger.note_off();
            if self.space == Space::Sustained {
                self.rolloff.start(velocity);
            }
        }
        all_released
    }

    /// Advances the velocity rolloff by one timer tick.
    ///
    /// Returns the published velocity, or `None` when no rolloff is running.
    /// Only velocity bindings move: the router runs with zero fingers.
    pub fn tick_rolloff(&mut self) -> Option<f32> {
        let velocity = self.rolloff.tick()?;
        self.tracker.override_velocity(velocity);
        self.router.route(&self.tracker, 0, false);
        self.router.apply();
        Some(velocity)
    }

    /// True while rolloff ticks still publish values.
    pub fn is_rolling_off(&self) -> bool {
        self.rolloff.is_active()
    }

    /// Switches space. Impulse space turns discrete pitch off.
    pub fn set_space(&mut self, space: Space) {
        self.space = space;
        if space == Space::Impulse {
            self.discrete = false;
        }
        tracing::debug!(?space, discrete = self.discrete, "space changed");
    }

    /// Active space.
    pub fn space(&self) -> Space {
        self.space
    }

    /// Enables discrete pitch. Ignored in impulse space.
    pub fn set_discrete(&mut self, on: bool) {
        self.discrete = on && self.space == Space::Sustained;
    }

    /// True when positional features snap to pitch buckets.
    pub fn is_discrete(&self) -> bool {
        self.discrete
    }

    /// Binds a feature to a parameter by name.
    pub fn bind(&mut self, feature: &str, parameter: &str) -> Result<(), BindingError> {
        self.router.bind_names(feature, parameter)
    }

    /// Removes a parameter's binding. The parameter keeps its last value.
    pub fn unbind(&mut self, parameter: &str) -> bool {
        self.router.unbind(parameter)
    }

    /// Feature bound to `parameter`.
    pub fn binding_for(&self, parameter: &str) -> Option<GestureFeature> {
        self.router.binding_for(parameter)
    }

    /// Changes how re-bound parameters move.
    pub fn set_rebind_policy(&mut self, policy: RebindPolicy) {
        self.router.set_policy(policy);
    }

    /// Current value of a parameter.
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.registry.get(name).map(|cell| cell.get())
    }

    /// Sets a parameter directly, bypassing the router. Values are clamped.
    pub fn set_parameter(&self, name: &str, value: f32) -> bool {
        match self.registry.get(name) {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }

    /// The parameter registry.
    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    /// The gesture tracker.
    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    /// Asks the renderer to restart from frame 0 at its next block.
    pub fn request_start(&self) {
        self.transport.request_start();
    }

    /// Asks the renderer to stop at its next block.
    pub fn request_stop(&self) {
        self.transport.request_stop();
    }

    /// Asks the capture side to discard the recording at its next callback.
    pub fn clear_recording(&mut self) {
        self.transport.request_clear();
        self.full_reported = false;
    }

    /// Envelope amplitude published by the renderer.
    pub fn amplitude(&self) -> f32 {
        self.transport.amplitude()
    }

    /// True while the renderer is playing.
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Current state for drawing.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let gesture = self.tracker.snapshot();
        SurfaceSnapshot {
            amplitude: self.transport.amplitude(),
            velocity: gesture.velocity,
            velocity_max: gesture.velocity_max,
            primary: gesture.primary,
            direction: gesture.direction,
            discrete_pitch: gesture.discrete_pitch,
            num_fingers: gesture.num_fingers,
            playing: self.transport.is_playing(),
            read_index: self.transport.read_index(),
            recorded_frames: self.buffer.recorded_len(),
            buffer_full: self.buffer.is_full(),
            space: self.space,
            discrete: self.discrete,
        }
    }

    /// Snapshot plus logging of playing/stopped and buffer-full transitions.
    ///
    /// Call from the UI timer; the audio threads never log.
    pub fn poll(&mut self) -> SurfaceSnapshot {
        let snap = self.snapshot();
        if snap.playing != self.was_playing {
            tracing::debug!(playing = snap.playing, read_index = snap.read_index, "playback state changed");
            self.was_playing = snap.playing;
        }
        if snap.buffer_full && !self.full_reported {
            tracing::warn!(frames = snap.recorded_frames, "recording buffer full");
            self.full_reported = true;
        }
        snap
    }
}
