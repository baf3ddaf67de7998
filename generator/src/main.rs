use anyhow::Context;
use clap::Parser;
use generator::profile::SineProfile;
use log::info;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::GeneratorConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic sine-wave source for the UDP scope")]
struct Args {
    /// Load the generator config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scope address datagrams are sent to
    #[arg(long, default_value = "127.0.0.1:12345")]
    destination: String,
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,
    #[arg(long, default_value_t = 100.0)]
    amplitude: f32,
    #[arg(long, default_value_t = 0.5)]
    frequency: f32,
    #[arg(long, default_value_t = 0.01)]
    phase_step: f64,
    #[arg(long, default_value_t = 4)]
    channels: usize,
    /// Peak uniform jitter added to every sample
    #[arg(long, default_value_t = 0.0)]
    noise: f32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stop after sending this many frames
    #[arg(long)]
    count: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        GeneratorConfig::load(path)?
    } else {
        GeneratorConfig::from_args(
            args.destination,
            args.interval_ms,
            SineProfile {
                amplitude: args.amplitude,
                frequency: args.frequency,
                phase_step: args.phase_step,
                channels: args.channels,
                noise: args.noise,
                seed: args.seed,
            },
        )
    };

    let mut runner = Runner::new(config)?;
    if let Some(count) = args.count {
        return runner.run_for(count);
    }

    let running = Arc::new(AtomicBool::new(true));
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;

    runtime.block_on(async {
        let flag = running.clone();
        let mut worker = tokio::task::spawn_blocking(move || runner.run(&flag));
        tokio::select! {
            joined = &mut worker => joined.context("joining generator loop")?,
            interrupted = signal::ctrl_c() => {
                interrupted.context("awaiting Ctrl+C to exit")?;
                info!("Ctrl+C received, stopping generator");
                running.store(false, Ordering::Release);
                worker.await.context("joining generator loop")?
            }
        }
    })
}
