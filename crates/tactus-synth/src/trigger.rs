//! Cross-thread note-on/note-off hand-off.
//!
//! The UI thread owns the gesture state and decides when a note starts and
//! ends; the audio thread owns the envelope. The only thing shared between
//! them is a [`TriggerHandle`]: a gate level and a note-on generation counter.
//!
//! A bare "triggered" flag loses short notes: if a finger goes down and up
//! between two audio blocks, the audio thread only ever sees the flag low. The
//! generation counter makes every note-on observable regardless of how quickly
//! the gate drops again.
//!
//! ## Ordering
//!
//! `note_on` stores the gate before bumping the generation with `Release`.
//! The envelope loads the generation with `Acquire` and then the gate, so when
//! it sees a new generation it also sees the gate that came with it (or a
//! later value).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Shared gate + generation pair written by the UI thread.
#[derive(Debug, Default)]
pub struct TriggerHandle {
    gate: AtomicBool,
    generation: AtomicU32,
}

impl TriggerHandle {
    /// Creates a handle with the gate low.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the gate and registers a new note-on.
    pub fn note_on(&self) {
        self.gate.store(true, Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Lowers the gate.
    pub fn note_off(&self) {
        self.gate.store(false, Ordering::Release);
    }

    /// Sets the gate from a trigger value: `true` is note-on, `false` note-off.
    pub fn trigger(&self, on: bool) {
        if on {
            self.note_on();
        } else {
            self.note_off();
        }
    }

    /// Current gate level.
    #[inline]
    pub fn is_gate_high(&self) -> bool {
        self.gate.load(Ordering::Acquire)
    }

    /// Number of note-ons registered so far (wrapping).
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }
}

/// What the audio thread observed when polling a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Nothing new since the last poll.
    None,
    /// At least one note-on happened since the last poll.
    NoteOn,
    /// The gate is low and no new note-on happened.
    GateLow,
}

/// Audio-side view of a [`TriggerHandle`] that remembers the last generation.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TriggerCursor {
    seen_generation: u32,
}

impl TriggerCursor {
    pub(crate) fn new(handle: &TriggerHandle) -> Self {
        Self {
            seen_generation: handle.generation(),
        }
    }

    pub(crate) fn poll(&mut self, handle: &TriggerHandle) -> TriggerEvent {
        let generation = handle.generation();
        if generation != self.seen_generation {
            self.seen_generation = generation;
            TriggerEvent::NoteOn
        } else if !handle.is_gate_high() {
            TriggerEvent::GateLow
        } else {
            TriggerEvent::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_on_bumps_generation() {
        let handle = TriggerHandle::new();
        assert!(!handle.is_gate_high());
        handle.note_on();
        assert!(handle.is_gate_high());
        assert_eq!(handle.generation(), 1);
        handle.note_off();
        assert!(!handle.is_gate_high());
        assert_eq!(handle.generation(), 1, "note-off must not count as a new note");
    }

    #[test]
    fn test_short_note_is_still_observed() {
        let handle = TriggerHandle::new();
        let mut cursor = TriggerCursor::new(&handle);
        handle.trigger(true);
        handle.trigger(false);
        assert_eq!(cursor.poll(&handle), TriggerEvent::NoteOn);
        assert_eq!(cursor.poll(&handle), TriggerEvent::GateLow);
    }

    #[test]
    fn test_held_gate_reports_nothing_new() {
        let handle = TriggerHandle::new();
        let mut cursor = TriggerCursor::new(&handle);
        handle.note_on();
        assert_eq!(cursor.poll(&handle), TriggerEvent::NoteOn);
        assert_eq!(cursor.poll(&handle), TriggerEvent::None);
    }

    #[test]
    fn test_cursor_created_late_ignores_old_notes() {
        let handle = TriggerHandle::new();
        handle.note_on();
        let mut cursor = TriggerCursor::new(&handle);
        assert_eq!(cursor.poll(&handle), TriggerEvent::None);
    }
}
