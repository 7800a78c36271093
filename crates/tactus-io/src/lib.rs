//! Real-time record/playback engine and audio I/O for tactus.
//!
//! One instrument is three thread-owned halves sharing atomics only:
//!
//! - [`ControlSurface`]: UI thread. Touch events in, parameter writes,
//!   envelope triggers and transport requests out.
//! - [`RealtimeEngine`]: output callback. Streams the recording through the
//!   effect chain, one block at a time.
//! - [`CaptureSink`]: input callback. Appends microphone audio to the shared
//!   [`RecordBuffer`].
//!
//! [`EngineContext::build`] wires all three from an
//! [`InstrumentConfig`](tactus_config::InstrumentConfig). Hardware streams go
//! through the [`AudioBackend`] trait ([`CpalBackend`] by default); offline
//! rendering uses [`read_wav`] and [`write_wav`].
//!
//! ```rust
//! use tactus_config::InstrumentConfig;
//! use tactus_core::AudioBlock;
//! use tactus_io::EngineContext;
//!
//! let config = InstrumentConfig::default();
//! let (mut surface, mut engine, mut capture) =
//!     EngineContext::with_capacity(&config, 1024).unwrap().into_parts();
//!
//! capture.capture(&[0.5; 2048]);
//! surface.touch_down(0, 400.0, 300.0);
//!
//! let mut out = AudioBlock::new(2, 512);
//! assert!(engine.render_block(&mut out).is_audible());
//! ```

pub mod backend;
mod capture;
mod context;
pub mod cpal_backend;
mod devices;
mod engine;
mod record;
mod surface;
mod transport;
mod wav;

pub use backend::{AudioBackend, BackendStreamConfig, StreamHandle};
pub use capture::CaptureSink;
pub use context::EngineContext;
pub use cpal_backend::CpalBackend;
pub use devices::{AudioDevice, default_device, list_devices};
pub use engine::{RealtimeEngine, RenderStatus};
pub use record::RecordBuffer;
pub use surface::{ControlSurface, ROUTER_CAPACITY, SurfaceSnapshot};
pub use tactus_config::{CaptureMode, Space};
pub use wav::{WavSpec, read_wav, write_wav};

/// Errors from building the instrument or talking to audio hardware.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid instrument configuration.
    #[error(transparent)]
    Config(#[from] tactus_config::ConfigError),

    /// A processing stage could not claim its parameter.
    #[error("parameter registry: {0}")]
    Registry(#[from] tactus_core::RegistryError),

    /// An initial gesture binding was rejected.
    #[error("binding: {0}")]
    Binding(#[from] tactus_platform::BindingError),
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
