//! Gesture scripts: timed touch events that stand in for a touch screen.
//!
//! ```toml
//! tail_ms = 500
//!
//! [[event]]
//! at_ms = 0
//! touch = "down"
//! x = 400
//! y = 300
//!
//! [[event]]
//! at_ms = 250
//! touch = "up"
//! x = 600
//! y = 300
//! ```
//!
//! Coordinates are in component units (`[gesture] width`/`height`).

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tactus_core::ms_to_samples;
use tactus_io::ControlSurface;

/// What a touch event does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchKind {
    Down,
    Move,
    Up,
}

/// One timed touch.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TouchEvent {
    /// Time from script start.
    pub at_ms: u64,
    pub touch: TouchKind,
    /// Finger id; defaults to 0.
    #[serde(default)]
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    /// Feeds the event to the surface.
    pub fn apply(&self, surface: &mut ControlSurface) {
        match self.touch {
            TouchKind::Down => surface.touch_down(self.id, self.x, self.y),
            TouchKind::Move => surface.touch_move(self.id, self.x, self.y),
            TouchKind::Up => {
                surface.touch_up(self.id, self.x, self.y);
            }
        }
    }
}

/// A list of touch events sorted by time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GestureScript {
    /// Extra time rendered after the last event.
    #[serde(default)]
    pub tail_ms: u64,
    #[serde(default, rename = "event")]
    pub events: Vec<TouchEvent>,
}

impl GestureScript {
    /// Reads a script from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading gesture script {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing gesture script {}", path.display()))
    }

    /// Parses a script. Events are ordered by `at_ms`, keeping file order for ties.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let mut script: Self = toml::from_str(text)?;
        script.events.sort_by_key(|e| e.at_ms);
        Ok(script)
    }

    /// One finger held at (`x`, `y`) for `hold_ms`.
    pub fn hold(x: f32, y: f32, hold_ms: u64) -> Self {
        let at = |at_ms, touch| TouchEvent {
            at_ms,
            touch,
            id: 0,
            x,
            y,
        };
        Self {
            tail_ms: 0,
            events: vec![at(0, TouchKind::Down), at(hold_ms, TouchKind::Up)],
        }
    }

    /// Time of the last event plus the tail.
    pub fn duration_ms(&self) -> u64 {
        self.events.last().map_or(0, |e| e.at_ms) + self.tail_ms
    }

    /// Cursor over the events, starting at the first.
    pub fn cursor(&self) -> ScriptCursor<'_> {
        ScriptCursor {
            events: &self.events,
            next: 0,
        }
    }
}

/// Hands out events as their time comes due.
#[derive(Debug)]
pub struct ScriptCursor<'a> {
    events: &'a [TouchEvent],
    next: usize,
}

impl<'a> ScriptCursor<'a> {
    /// Events with `at_ms <= now_ms` not yet returned.
    pub fn due(&mut self, now_ms: u64) -> &'a [TouchEvent] {
        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].at_ms <= now_ms {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    /// True once every event has been returned.
    pub fn is_finished(&self) -> bool {
        self.next == self.events.len()
    }
}

/// Milliseconds to whole frames, rounded.
pub fn ms_to_frames(ms: u64, sample_rate: u32) -> usize {
    ms_to_samples(ms as f32, sample_rate as f32).round() as usize
}

/// Whole frames to milliseconds, rounded down.
pub fn frames_to_ms(frames: usize, sample_rate: u32) -> u64 {
    (frames as u64 * 1000) / u64::from(sample_rate.max(1))
}
