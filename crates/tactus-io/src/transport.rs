//! Atomic play state shared between the control surface and the threads.
//!
//! | Field            | Writer        | Reader        |
//! |------------------|---------------|---------------|
//! | start/stop flags | control       | render        |
//! | clear flag       | control       | capture       |
//! | playing          | render        | control       |
//! | read index       | render        | control       |
//! | amplitude        | render        | control       |
//!
//! Each field is independently meaningful; no multi-field transaction exists.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Transport {
    start_requested: AtomicBool,
    stop_requested: AtomicBool,
    clear_requested: AtomicBool,
    playing: AtomicBool,
    read_index: AtomicUsize,
    amplitude: AtomicU32,
}

impl Transport {
    pub(crate) fn request_start(&self) {
        self.start_requested.store(true, Ordering::Release);
    }

    pub(crate) fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    pub(crate) fn request_clear(&self) {
        self.clear_requested.store(true, Ordering::Release);
    }

    pub(crate) fn take_start(&self) -> bool {
        self.start_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn take_stop(&self) -> bool {
        self.stop_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn take_clear(&self) -> bool {
        self.clear_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn publish(&self, playing: bool, read_index: usize, amplitude: f32) {
        self.read_index.store(read_index, Ordering::Relaxed);
        self.amplitude.store(amplitude.to_bits(), Ordering::Relaxed);
        self.playing.store(playing, Ordering::Release);
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub(crate) fn read_index(&self) -> usize {
        self.read_index.load(Ordering::Relaxed)
    }

    pub(crate) fn amplitude(&self) -> f32 {
        f32::from_bits(self.amplitude.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_consumed_once() {
        let t = Transport::default();
        assert!(!t.take_start());
        t.request_start();
        assert!(t.take_start());
        assert!(!t.take_start());

        t.request_stop();
        t.request_clear();
        assert!(t.take_stop());
        assert!(t.take_clear());
    }

    #[test]
    fn test_publish() {
        let t = Transport::default();
        t.publish(true, 42, 0.5);
        assert!(t.is_playing());
        assert_eq!(t.read_index(), 42);
        assert_eq!(t.amplitude(), 0.5);
    }
}
