//! Real-time pitch and tempo stretch.
//!
//! A two-grain overlap-add shifter reading from a per-channel history ring.
//!
//! ```text
//!            written ──►
//! history:  ....[ grain A ........ ]
//!                      [ grain B ........ ]
//!                 ▲ start = written − lag
//! ```
//!
//! Each grain reads `GRAIN` output samples from the history, advancing by
//! the pitch ratio per sample, under a triangular window. The two grains are
//! offset by half a grain so their windows always sum to one. Tempo moves the
//! grain *start* positions: the read lag grows by `1 − tempo` per sample, so
//! successive grains begin further behind (slower) or closer to the write
//! head (faster). The lag is bounded below by what the next grain needs to
//! stay behind the write head, and above by the ring length; crossing the
//! upper bound resyncs to the lower one.
//!
//! With pitch and tempo both at their neutral 0.5 the stage is a one-sample
//! delay.

#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use tactus_core::{AudioBlock, BlockContext, Effect, PITCH, ParamCell, ParamRegistry, RegistryError, TEMPO};

/// Grain length in samples.
pub const GRAIN: usize = 1024;

/// History ring length per channel.
const HISTORY: usize = 32768;

/// Largest lag that still leaves a whole grain inside the ring.
const MAX_LAG: f64 = (HISTORY - GRAIN - 4) as f64;

/// Maps a normalized `[0, 1]` control to a playback ratio in `[0.5, 2]`.
///
/// 0.5 is unity; each end is one octave (or double/half speed).
pub fn control_to_ratio(control: f32) -> f32 {
    libm::exp2f((control.clamp(0.0, 1.0) - 0.5) * 2.0)
}

/// Smallest lag at which a grain reading at `ratio` never passes the
/// write head.
fn min_lag(ratio: f64) -> f64 {
    (GRAIN as f64 * (ratio - 1.0) + 1.0).max(1.0)
}

#[derive(Debug, Clone, Copy)]
struct Grain {
    phase: usize,
    start: f64,
    ratio: f64,
}

impl Grain {
    fn window(&self) -> f32 {
        let x = 2.0 * self.phase as f32 / GRAIN as f32;
        1.0 - (x - 1.0).abs()
    }

    fn position(&self) -> f64 {
        self.start + self.phase as f64 * self.ratio
    }
}

/// Grain timing shared by every channel.
///
/// The clock is `Copy` so each channel can replay the same evolution from the
/// state at the top of the block.
#[derive(Debug, Clone, Copy)]
struct GrainClock {
    written: u64,
    lag: f64,
    grains: [Grain; 2],
}

impl GrainClock {
    fn new() -> Self {
        let lag = 1.0;
        Self {
            written: 0,
            lag,
            grains: [
                Grain {
                    phase: 0,
                    start: -lag,
                    ratio: 1.0,
                },
                Grain {
                    phase: GRAIN / 2,
                    start: -lag - (GRAIN / 2) as f64,
                    ratio: 1.0,
                },
            ],
        }
    }

    fn render(&self, history: &[f32]) -> f32 {
        self.grains
            .iter()
            .map(|g| g.window() * read_interpolated(history, g.position(), self.written))
            .sum()
    }

    /// Delay in samples between the next input and what the next output
    /// reads, averaged over both grains by window weight.
    fn read_delay(&self) -> f64 {
        self.grains
            .iter()
            .map(|g| f64::from(g.window()) * (self.written as f64 - g.position()))
            .sum()
    }

    fn step(&mut self, pitch: f64, tempo: f64) {
        self.lag += 1.0 - tempo;
        for grain in &mut self.grains {
            grain.phase += 1;
            if grain.phase >= GRAIN {
                let floor = min_lag(pitch);
                if self.lag > MAX_LAG {
                    self.lag = floor;
                } else {
                    self.lag = self.lag.max(floor);
                }
                *grain = Grain {
                    phase: 0,
                    start: self.written as f64 - self.lag,
                    ratio: pitch,
                };
            }
        }
    }
}

/// Linear interpolation at absolute position `pos`. Positions before the
/// first written sample read as silence.
#[inline]
fn read_interpolated(history: &[f32], pos: f64, written: u64) -> f32 {
    if pos < 0.0 {
        return 0.0;
    }
    let index = pos as u64;
    let frac = (pos - index as f64) as f32;
    let a = history[(index % HISTORY as u64) as usize];
    if frac == 0.0 || index + 1 >= written {
        return a;
    }
    let b = history[((index + 1) % HISTORY as u64) as usize];
    a + (b - a) * frac
}

/// Granular pitch shifter with independent tempo control.
///
/// ## Parameters
/// - `pitch`: 0.0 to 1.0, one octave down to one octave up (default 0.5)
/// - `tempo`: 0.0 to 1.0, half to double speed (default 0.5)
pub struct TimeStretch {
    pitch: Arc<ParamCell>,
    tempo: Arc<ParamCell>,
    history: Vec<f32>,
    channels: usize,
    clock: GrainClock,
}

impl TimeStretch {
    /// Stage name used when claiming `pitch` and `tempo`.
    pub const NAME: &'static str = "stretch";

    /// Creates the stage with history for `channels` channels.
    pub fn new(pitch: Arc<ParamCell>, tempo: Arc<ParamCell>, channels: usize) -> Self {
        let channels = channels.max(1);
        Self {
            pitch,
            tempo,
            history: vec![0.0; channels * HISTORY],
            channels,
            clock: GrainClock::new(),
        }
    }

    /// Claims `pitch` and `tempo` from the registry.
    pub fn from_registry(registry: &mut ParamRegistry, channels: usize) -> Result<Self, RegistryError> {
        let pitch = registry.claim(PITCH, Self::NAME)?;
        let tempo = registry.claim(TEMPO, Self::NAME)?;
        Ok(Self::new(pitch, tempo, channels))
    }

    /// Current pitch ratio.
    pub fn pitch_ratio(&self) -> f32 {
        control_to_ratio(self.pitch.get())
    }

    /// Current tempo ratio.
    pub fn tempo_ratio(&self) -> f32 {
        control_to_ratio(self.tempo.get())
    }
}

impl Effect for TimeStretch {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn process_block(&mut self, block: &mut AudioBlock, _ctx: &BlockContext) {
        let pitch = f64::from(self.pitch_ratio());
        let tempo = f64::from(self.tempo_ratio());
        let start = self.clock;
        let mut end = start;

        for ch in 0..block.channels().min(self.channels) {
            let history = &mut self.history[ch * HISTORY..(ch + 1) * HISTORY];
            let mut clock = start;
            for sample in block.channel_mut(ch) {
                history[(clock.written % HISTORY as u64) as usize] = *sample;
                clock.written += 1;
                *sample = clock.render(history);
                clock.step(pitch, tempo);
            }
            end = clock;
        }

        self.clock = end;
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    fn reset(&mut self) {
        self.history.fill(0.0);
        self.clock = GrainClock::new();
    }

    /// Window-weighted read delay of the grains. With pitch shifted it moves
    /// within each grain but its weighted average stays put.
    fn latency_samples(&self) -> usize {
        libm::round(self.clock.read_delay()).max(0.0) as usize
    }
}
