//! Live mode: record from the input device and play through the output while
//! a gesture script drives the surface in real time.

use super::common::load_config;
use crate::script::GestureScript;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tactus_io::{AudioBackend, BackendStreamConfig, CpalBackend, EngineContext};

#[derive(Args)]
pub struct LiveArgs {
    /// Gesture script (TOML)
    #[arg(short, long)]
    script: PathBuf,

    /// Instrument configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input device (index, name, or part of a name)
    #[arg(long)]
    input: Option<String>,

    /// Output device (index, name, or part of a name)
    #[arg(long)]
    output: Option<String>,

    /// Seconds to record before the script starts
    #[arg(long, default_value = "2.0")]
    record_seconds: f32,
}

pub fn run(args: LiveArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let script = GestureScript::load(&args.script)?;

    let backend = CpalBackend::new();
    let mut out_cfg = BackendStreamConfig::from_audio(&config.audio, args.output.clone());
    let mut in_cfg = BackendStreamConfig::from_audio(&config.audio, args.input.clone());

    let actual = backend.actual_sample_rate(&out_cfg);
    if actual != config.audio.sample_rate {
        tracing::warn!(
            requested = config.audio.sample_rate,
            actual,
            "output device runs at a different rate; following the device"
        );
        config.audio.sample_rate = actual;
        out_cfg.sample_rate = actual;
        in_cfg.sample_rate = actual;
    }

    let (mut surface, mut engine, mut capture) = EngineContext::build(&config)?.into_parts();

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let _input = backend.build_input_stream(
        &in_cfg,
        Box::new(move |data: &[f32]| {
            capture.capture(data);
        }),
        Box::new(|err: &str| tracing::error!(error = err, "input stream error")),
    )?;
    let _output = backend.build_output_stream(
        &out_cfg,
        Box::new(move |data: &mut [f32]| {
            engine.render_interleaved(data);
        }),
        Box::new(|err: &str| tracing::error!(error = err, "output stream error")),
    )?;

    println!("Live: {} Hz, {} channel(s)", config.audio.sample_rate, config.audio.channels);
    println!("Recording for {:.1}s, then running {}...", args.record_seconds, args.script.display());
    println!("\nPress Ctrl+C to stop...\n");

    let tick = Duration::from_millis(u64::from(config.gesture.rolloff_interval_ms));
    let record_until = Instant::now() + Duration::from_secs_f32(args.record_seconds.max(0.0));
    while running.load(Ordering::SeqCst) && Instant::now() < record_until {
        surface.poll();
        std::thread::sleep(tick);
    }

    let start = Instant::now();
    let mut cursor = script.cursor();
    while running.load(Ordering::SeqCst) {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        for event in cursor.due(elapsed_ms) {
            event.apply(&mut surface);
        }
        surface.tick_rolloff();
        surface.poll();

        if cursor.is_finished() && elapsed_ms >= script.duration_ms() && !surface.is_rolling_off() {
            break;
        }
        std::thread::sleep(tick);
    }

    println!("Done!");
    Ok(())
}
