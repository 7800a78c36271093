//! tactus CLI - plays a recording through scripted touch gestures.

mod commands;
mod script;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tactus")]
#[command(author, version, about = "Touch-gesture audio instrument", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a WAV recording through a gesture script to a WAV file
    Render(commands::render::RenderArgs),

    /// Record from an input device and play it back under a gesture script
    Live(commands::live::LiveArgs),

    /// List audio devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    // cpal reports through `log`.
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Live(args) => commands::live::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
