//! Pluggable audio backend.
//!
//! [`AudioBackend`] keeps the platform audio API out of the instrument. The
//! engine only ever sees interleaved `f32` buffers handed to boxed callbacks,
//! so the same [`RealtimeEngine`](crate::RealtimeEngine) and
//! [`CaptureSink`](crate::CaptureSink) run under cpal, a host-provided buffer
//! or a test harness.
//!
//! Streams come back as a [`StreamHandle`]; the stream runs until the handle
//! is dropped.

use crate::{AudioDevice, Result};
use tactus_config::AudioConfig;

/// Parameters for opening one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred callback size in frames.
    pub buffer_size: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Device name, index or substring. `None` picks the system default.
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_size: 512,
            channels: 2,
            device_name: None,
        }
    }
}

impl BackendStreamConfig {
    /// Stream settings matching the instrument's audio section.
    pub fn from_audio(audio: &AudioConfig, device_name: Option<String>) -> Self {
        Self {
            sample_rate: audio.sample_rate,
            buffer_size: u32::try_from(audio.block_size).unwrap_or(u32::MAX),
            channels: audio.channels,
            device_name,
        }
    }
}

/// Keeps a backend stream alive. Dropping it stops the stream.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wraps a backend-specific stream object.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Fills an interleaved output buffer. Runs on the audio thread: no
/// allocation, locks or I/O.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Receives an interleaved input buffer on the audio thread.
pub type InputCallback = Box<dyn FnMut(&[f32]) + Send>;

/// Receives stream errors as text.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Platform audio API.
///
/// Object safe, so a backend can be chosen at runtime as
/// `Box<dyn AudioBackend>`.
pub trait AudioBackend: Send {
    /// Short backend name, e.g. `"cpal"`.
    fn name(&self) -> &str;

    /// Every device this backend can open.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// The system default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// The system default input device, if any.
    fn default_input_device(&self) -> Result<Option<AudioDevice>>;

    /// Opens and starts an output stream driven by `callback`.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Opens and starts an input stream feeding `callback`.
    fn build_input_stream(
        &self,
        config: &BackendStreamConfig,
        callback: InputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;

    /// Sample rate the backend would actually run `config` at.
    fn actual_sample_rate(&self, config: &BackendStreamConfig) -> u32 {
        config.sample_rate
    }
}
