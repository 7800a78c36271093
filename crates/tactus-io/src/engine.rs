//! Output side: streams the recording through the effect chain.
//!
//! ## Per-block contract
//!
//! 1. Clear the output and advance both envelopes by the block length.
//! 2. Honor pending stop/start requests; a start rewinds the cursor and clears
//!    the chain's state. If not playing, or the read cursor
//!    has reached the recorded length, leave the block silent, rewind the
//!    cursor and report [`RenderStatus::Stopped`].
//! 3. Copy `min(block, recorded − read)` frames, taking output channel `ch`
//!    from recorded channel `ch % recorded_channels`.
//! 4. Run the chain over the copied region with the envelope amplitude.
//!
//! Rendering never allocates, locks or fails.

use std::sync::Arc;

use tactus_core::{AudioBlock, BlockContext};
use tactus_effects::ProcessorChain;
use tactus_synth::Envelope;

use crate::record::RecordBuffer;
use crate::transport::Transport;

/// Outcome of one rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// Nothing was playing; the block is silent.
    Stopped,
    /// `frames` recorded frames were rendered and more may follow.
    Playing {
        /// Frames copied from the recording.
        frames: usize,
    },
    /// The recording ran out inside this block after `frames` frames; the rest
    /// of the block is silent and playback has stopped.
    Ended {
        /// Frames copied from the recording.
        frames: usize,
    },
}

impl RenderStatus {
    /// Frames copied from the recording.
    pub fn frames(self) -> usize {
        match self {
            RenderStatus::Stopped => 0,
            RenderStatus::Playing { frames } | RenderStatus::Ended { frames } => frames,
        }
    }

    /// True if any recorded audio reached the output.
    pub fn is_audible(self) -> bool {
        self.frames() > 0
    }
}

/// Real-time renderer, owned by the output callback.
pub struct RealtimeEngine {
    buffer: Arc<RecordBuffer>,
    transport: Arc<Transport>,
    chain: ProcessorChain,
    ar: Envelope,
    adsr: Envelope,
    scratch: AudioBlock,
    read: usize,
    playing: bool,
    sample_rate: f32,
}

impl RealtimeEngine {
    pub(crate) fn new(
        buffer: Arc<RecordBuffer>,
        transport: Arc<Transport>,
        chain: ProcessorChain,
        ar: Envelope,
        adsr: Envelope,
        channels: usize,
        block_size: usize,
    ) -> Self {
        let sample_rate = chain.sample_rate();
        Self {
            buffer,
            transport,
            chain,
            ar,
            adsr,
            scratch: AudioBlock::new(channels.max(1), block_size.max(1)),
            read: 0,
            playing: false,
            sample_rate,
        }
    }

    /// Renders one block into `out`, using its active length as the block size.
    pub fn render_block(&mut self, out: &mut AudioBlock) -> RenderStatus {
        out.clear();
        let block_len = out.len();
        let amplitude = self.ar.advance(block_len).max(self.adsr.advance(block_len));

        if self.transport.take_stop() {
            self.playing = false;
        }
        if self.transport.take_start() {
            self.playing = true;
            self.read = 0;
            self.chain.reset();
        }

        let recorded = self.buffer.recorded_len();
        if !self.playing || self.read >= recorded {
            self.playing = false;
            self.read = 0;
            self.transport.publish(false, self.read, amplitude);
            return RenderStatus::Stopped;
        }

        let frames = block_len.min(recorded - self.read);
        let source_channels = self.buffer.channels();
        for ch in 0..out.channels() {
            let src = ch % source_channels;
            for (i, sample) in out.channel_mut(ch)[..frames].iter_mut().enumerate() {
                *sample = self.buffer.read(src, self.read + i);
            }
        }
        self.read += frames;

        out.set_len(frames);
        self.chain.process(out, &BlockContext::new(amplitude, self.sample_rate));
        out.set_len(block_len);

        let status = if frames < block_len {
            self.playing = false;
            RenderStatus::Ended { frames }
        } else {
            RenderStatus::Playing { frames }
        };
        self.transport.publish(self.playing, self.read, amplitude);
        status
    }

    /// Renders interleaved output, as handed over by an audio callback.
    ///
    /// The buffer is rendered in chunks of at most one internal block. Frames
    /// that do not fill a whole frame of `channels` samples are zeroed.
    pub fn render_interleaved(&mut self, out: &mut [f32]) -> RenderStatus {
        let channels = self.scratch.channels();
        let chunk_samples = self.scratch.capacity() * channels;
        let mut copied = 0;
        let mut ended = false;

        let whole = out.len() - out.len() % channels;
        out[whole..].fill(0.0);
        for chunk in out[..whole].chunks_mut(chunk_samples) {
            self.scratch.set_len(chunk.len() / channels);
            let status = self.render_block_scratch();
            self.scratch.write_interleaved(chunk);
            copied += status.frames();
            ended |= matches!(status, RenderStatus::Ended { .. });
        }

        if ended {
            RenderStatus::Ended { frames: copied }
        } else if copied > 0 {
            RenderStatus::Playing { frames: copied }
        } else {
            RenderStatus::Stopped
        }
    }

    fn render_block_scratch(&mut self) -> RenderStatus {
        // Zero-capacity placeholder; does not allocate.
        let mut block = std::mem::replace(&mut self.scratch, AudioBlock::new(0, 0));
        let status = self.render_block(&mut block);
        self.scratch = block;
        status
    }

    /// Frames rendered since playback last started.
    pub fn read_index(&self) -> usize {
        self.read
    }

    /// True while playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Output channel count of [`render_interleaved`](Self::render_interleaved).
    pub fn channels(&self) -> usize {
        self.scratch.channels()
    }

    /// Frames per internal block.
    pub fn block_size(&self) -> usize {
        self.scratch.capacity()
    }

    /// Current envelope amplitude.
    pub fn amplitude(&self) -> f32 {
        self.ar.level().max(self.adsr.level())
    }

    /// The effect chain.
    pub fn chain(&self) -> &ProcessorChain {
        &self.chain
    }
}
