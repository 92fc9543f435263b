mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Paced serial-addition task in the terminal.
///
/// Numbers appear on a timer; answer each one with the sum of the last
/// two by typing it and pressing Enter. The pace adapts to how you do.
#[derive(Parser, Debug)]
#[command(name = "pasat", version, about)]
struct Args {
    /// Starting inter-stimulus interval in milliseconds
    #[arg(long, default_value_t = 3000)]
    isi: u64,

    /// Delay before the first stimulus in milliseconds
    #[arg(long)]
    delay: Option<u64>,

    /// Session length in seconds; 0 runs until `q`, EOF, or Ctrl-C
    #[arg(long, default_value_t = 300)]
    duration: u64,

    /// How many recent scored trials the adaptive pacer inspects
    #[arg(long, default_value_t = 4)]
    window: usize,

    /// Adaptive ISI step in milliseconds
    #[arg(long, default_value_t = 100)]
    step: u64,

    /// Lowest ISI the pacer may reach in milliseconds
    #[arg(long, default_value_t = 100)]
    floor: u64,

    /// Seed for the stimulus sequence; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Write the raw event table to this CSV file on exit
    #[arg(long)]
    events_csv: Option<PathBuf>,

    /// Write the per-session aggregate table to this CSV file on exit
    #[arg(long)]
    sessions_csv: Option<PathBuf>,

    /// Suppress live stimulus and result output
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    app::run(args).await
}
