//! Planar multi-channel audio block.
//!
//! Storage for all channels is allocated once at construction with a fixed
//! per-channel capacity. The active length can shrink and grow within that
//! capacity on the audio thread without touching the allocator, which is how
//! the engine hands only the filled region of an output block to the effects.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// A block of `channels × len` samples stored channel-major.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    data: Vec<f32>,
    channels: usize,
    capacity: usize,
    len: usize,
}

impl AudioBlock {
    /// Creates a zeroed block whose active length equals its capacity.
    ///
    /// A zero channel count is raised to one.
    pub fn new(channels: usize, capacity: usize) -> Self {
        let channels = channels.max(1);
        Self {
            data: vec![0.0; channels * capacity],
            channels,
            capacity,
            len: capacity,
        }
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Active samples per channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the active length is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum samples per channel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets the active length, saturating at capacity.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.capacity);
    }

    /// Active samples of one channel.
    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.capacity;
        &self.data[start..start + self.len]
    }

    /// Mutable active samples of one channel.
    #[inline]
    pub fn channel_mut(&mut self, ch: usize) -> &mut [f32] {
        let start = ch * self.capacity;
        &mut self.data[start..start + self.len]
    }

    /// Zeroes the active region of every channel.
    pub fn clear(&mut self) {
        for ch in 0..self.channels {
            self.channel_mut(ch).fill(0.0);
        }
    }

    /// Writes the active region as interleaved frames into `out`.
    ///
    /// Copies `min(len, out.len() / channels)` frames.
    pub fn write_interleaved(&self, out: &mut [f32]) {
        let frames = self.len.min(out.len() / self.channels);
        for (frame, chunk) in out.chunks_exact_mut(self.channels).take(frames).enumerate() {
            for (ch, sample) in chunk.iter_mut().enumerate() {
                *sample = self.data[ch * self.capacity + frame];
            }
        }
    }

    /// Fills the block from interleaved frames, setting the active length to
    /// the number of complete frames read (bounded by capacity).
    pub fn read_interleaved(&mut self, input: &[f32]) {
        let frames = (input.len() / self.channels).min(self.capacity);
        for (frame, chunk) in input.chunks_exact(self.channels).take(frames).enumerate() {
            for (ch, &sample) in chunk.iter().enumerate() {
                self.data[ch * self.capacity + frame] = sample;
            }
        }
        self.len = frames;
    }

    /// Peak absolute sample over the active region.
    pub fn peak(&self) -> f32 {
        (0..self.channels)
            .flat_map(|ch| self.channel(ch).iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
