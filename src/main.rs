use std::path::PathBuf;

use anyhow::Result;
use biolume_core::config::AppConfig;
use biolume_lib::app::{self, App};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// What to run
    #[arg(short, long, value_enum, default_value = "population")]
    mode: Mode,

    /// Stop after this many generations (ticks in node mode)
    #[arg(short, long)]
    generations: Option<u64>,

    /// Seed for the simulation stream; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Delay between generations in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Resume from a population snapshot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a population snapshot on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    /// Flat list or toroidal grid stepped in lockstep
    Population,
    /// Standalone organisms exchanging genes over in-process links
    Node,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(seed) = self.seed {
            config.population.seed = Some(seed);
        }
        if let Some(delay) = self.delay_ms {
            config.runtime.tick_delay_ms = delay;
        }
        if let Some(generations) = self.generations {
            config.runtime.max_generations = Some(generations);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    biolume_core::init_logging(&args.log_level);

    let mut config = AppConfig::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;
    tracing::info!(fingerprint = %config.fingerprint(), mode = ?args.mode, "Configuration loaded");

    match args.mode {
        Mode::Population => {
            let app = match &args.load {
                Some(path) => App::load(config, path)?,
                None => App::new(config)?,
            };
            let mut app = app.with_save_path(args.save.clone());
            app.run().await?;
        }
        Mode::Node => {
            if args.load.is_some() || args.save.is_some() {
                tracing::warn!("Snapshots apply to population mode only; ignoring --load/--save");
            }
            let count = config.population.cardinality();
            app::run_nodes(&config, count).await?;
        }
    }

    Ok(())
}
