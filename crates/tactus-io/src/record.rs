//! Fixed-capacity recording buffer shared by the capture and render threads.
//!
//! Samples are stored as `f32` bit patterns in `AtomicU32` slots so the
//! capture thread can write while the render thread reads without locks or
//! `unsafe`. Only the capture side writes samples and publishes the recorded
//! length (with `Release`); the render side loads the length with `Acquire`
//! before reading any sample below it.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use tactus_config::CaptureMode;

/// Planar recording buffer, allocated once at construction.
#[derive(Debug)]
pub struct RecordBuffer {
    channels: Vec<Box<[AtomicU32]>>,
    capacity: usize,
    recorded: AtomicUsize,
    full: AtomicBool,
    mode: CaptureMode,
}

impl RecordBuffer {
    /// Allocates `channels × capacity` silent slots.
    pub fn new(channels: usize, capacity: usize, mode: CaptureMode) -> Self {
        let channels = channels.max(1);
        let capacity = capacity.max(1);
        Self {
            channels: (0..channels)
                .map(|_| (0..capacity).map(|_| AtomicU32::new(0)).collect())
                .collect(),
            capacity,
            recorded: AtomicUsize::new(0),
            full: AtomicBool::new(false),
            mode,
        }
    }

    /// Recorded channel count.
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Capacity in frames per channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capture behavior once full.
    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Frames of valid audio per channel.
    #[inline]
    pub fn recorded_len(&self) -> usize {
        self.recorded.load(Ordering::Acquire)
    }

    /// True once capture has reached capacity.
    pub fn is_full(&self) -> bool {
        self.full.load(Ordering::Acquire)
    }

    /// Reads one sample. Out-of-range positions read as silence.
    #[inline]
    pub fn read(&self, channel: usize, frame: usize) -> f32 {
        self.channels
            .get(channel)
            .and_then(|ch| ch.get(frame))
            .map_or(0.0, |slot| f32::from_bits(slot.load(Ordering::Relaxed)))
    }

    /// Writes one sample; callers publish the length afterwards.
    #[inline]
    pub(crate) fn write(&self, channel: usize, frame: usize, sample: f32) {
        if let Some(slot) = self.channels.get(channel).and_then(|ch| ch.get(frame)) {
            slot.store(sample.to_bits(), Ordering::Relaxed);
        }
    }

    pub(crate) fn publish_len(&self, frames: usize) {
        self.recorded.store(frames.min(self.capacity), Ordering::Release);
    }

    pub(crate) fn set_full(&self, full: bool) {
        self.full.store(full, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_empty_and_silent() {
        let buf = RecordBuffer::new(2, 8, CaptureMode::SingleTake);
        assert_eq!(buf.channels(), 2);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.recorded_len(), 0);
        assert!(!buf.is_full());
        assert_eq!(buf.read(1, 7), 0.0);
    }

    #[test]
    fn test_write_read_and_bounds() {
        let buf = RecordBuffer::new(1, 4, CaptureMode::SingleTake);
        buf.write(0, 2, -0.75);
        assert_eq!(buf.read(0, 2), -0.75);
        buf.write(0, 10, 1.0);
        buf.write(3, 0, 1.0);
        assert_eq!(buf.read(0, 10), 0.0);
        assert_eq!(buf.read(3, 0), 0.0);
    }

    #[test]
    fn test_published_len_saturates_at_capacity() {
        let buf = RecordBuffer::new(1, 4, CaptureMode::Looping);
        buf.publish_len(9);
        assert_eq!(buf.recorded_len(), 4);
    }
}
