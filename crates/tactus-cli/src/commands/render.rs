//! Offline rendering: a WAV recording played through a scripted gesture.

use super::common::{linear_to_db, load_config, peak};
use crate::script::{GestureScript, frames_to_ms, ms_to_frames};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tactus_io::{EngineContext, WavSpec, read_wav, write_wav};

#[derive(Args)]
pub struct RenderArgs {
    /// Recording to play (WAV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Rendered output (WAV)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Instrument configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gesture script (TOML). Without one, a single touch is held at the
    /// centre for the length of the recording.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav(&args.input)?;
    if spec.channels == 0 || spec.channels > 8 {
        anyhow::bail!("{} has {} channels; 1 to 8 are supported", args.input.display(), spec.channels);
    }
    let channels = usize::from(spec.channels);
    let frames = samples.len() / channels;
    if frames == 0 {
        anyhow::bail!("{} contains no audio", args.input.display());
    }
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    config.audio.sample_rate = spec.sample_rate;
    config.audio.channels = spec.channels;

    let script = match &args.script {
        Some(path) => GestureScript::load(path)?,
        None => GestureScript::hold(
            config.gesture.width / 2.0,
            config.gesture.height / 2.0,
            frames_to_ms(frames, spec.sample_rate),
        ),
    };
    println!("Gesture: {} event(s), {} ms", script.events.len(), script.duration_ms());

    let (mut surface, mut engine, mut capture) =
        EngineContext::with_capacity(&config, frames)?.into_parts();
    capture.capture(&samples);

    let sample_rate = spec.sample_rate;
    let block = config.audio.block_size;
    let total_frames = ms_to_frames(script.duration_ms(), sample_rate).max(block);
    let tick_frames = ms_to_frames(u64::from(config.gesture.rolloff_interval_ms), sample_rate).max(1);

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = vec![0.0f32; total_frames * channels];
    let mut cursor = script.cursor();
    let mut next_tick = tick_frames;
    for (index, chunk) in output.chunks_mut(block * channels).enumerate() {
        let frame = index * block;
        for event in cursor.due(frames_to_ms(frame, sample_rate)) {
            event.apply(&mut surface);
        }
        while next_tick <= frame {
            surface.tick_rolloff();
            next_tick += tick_frames;
        }
        engine.render_interleaved(chunk);
        surface.poll();
        pb.set_position((frame + block).min(total_frames) as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    println!("  Input peak:  {:.1} dB", linear_to_db(peak(&samples)));
    println!("  Output peak: {:.1} dB", linear_to_db(peak(&output)));

    let out_spec = WavSpec {
        channels: spec.channels,
        sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}
