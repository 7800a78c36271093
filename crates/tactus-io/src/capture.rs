//! Input side: appends microphone audio to the recording buffer.

use std::sync::Arc;

use tactus_config::CaptureMode;

use crate::record::RecordBuffer;
use crate::transport::Transport;

/// Writer half of the recording buffer, owned by the input callback.
///
/// The write position lives here, not in the shared buffer, so exactly one
/// thread ever writes samples.
pub struct CaptureSink {
    buffer: Arc<RecordBuffer>,
    transport: Arc<Transport>,
    write: usize,
}

impl CaptureSink {
    pub(crate) fn new(buffer: Arc<RecordBuffer>, transport: Arc<Transport>) -> Self {
        Self {
            buffer,
            transport,
            write: 0,
        }
    }

    /// Appends interleaved frames laid out with the recording's channel count.
    ///
    /// Returns the number of frames accepted.
    pub fn capture(&mut self, interleaved: &[f32]) -> usize {
        let channels = self.buffer.channels();
        self.capture_from(interleaved, channels)
    }

    /// Appends interleaved frames with `input_channels` channels.
    ///
    /// Recording channel `ch` takes input channel `ch % input_channels`. In
    /// single-take mode capture stops at capacity and sets the full flag; in
    /// looping mode it wraps and overwrites the oldest frames.
    pub fn capture_from(&mut self, interleaved: &[f32], input_channels: usize) -> usize {
        if self.transport.take_clear() {
            self.write = 0;
            self.buffer.publish_len(0);
            self.buffer.set_full(false);
        }
        if input_channels == 0 {
            return 0;
        }

        let capacity = self.buffer.capacity();
        let rec_channels = self.buffer.channels();
        let frames = interleaved.len() / input_channels;

        match self.buffer.mode() {
            CaptureMode::SingleTake => {
                let accepted = frames.min(capacity - self.write);
                for (i, frame) in interleaved.chunks_exact(input_channels).take(accepted).enumerate() {
                    for ch in 0..rec_channels {
                        self.buffer.write(ch, self.write + i, frame[ch % input_channels]);
                    }
                }
                self.write += accepted;
                self.buffer.publish_len(self.write);
                if self.write == capacity {
                    self.buffer.set_full(true);
                }
                accepted
            }
            CaptureMode::Looping => {
                let mut recorded = self.buffer.recorded_len();
                for frame in interleaved.chunks_exact(input_channels) {
                    for ch in 0..rec_channels {
                        self.buffer.write(ch, self.write, frame[ch % input_channels]);
                    }
                    self.write += 1;
                    recorded = recorded.max(self.write);
                    if self.write == capacity {
                        self.write = 0;
                        self.buffer.set_full(true);
                    }
                }
                self.buffer.publish_len(recorded);
                frames
            }
        }
    }

    /// Next frame index capture will write.
    pub fn write_position(&self) -> usize {
        self.write
    }

    /// Shared buffer this sink writes into.
    pub fn buffer(&self) -> &Arc<RecordBuffer> {
        &self.buffer
    }
}
