pub mod node;
pub mod shutdown;

pub use node::{BiolumeNode, NodeRing, NodeState, NodeTick};
pub use shutdown::ShutdownManager;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use biolume_core::config::{AppConfig, RuntimeConfig};
use biolume_core::metrics::Metrics;
use biolume_core::population::{Population, TickReport};

/// Population-mode runner.
pub struct App {
    pub config: AppConfig,
    pub population: Population,
    pub metrics: Arc<Metrics>,
    pub shutdown: ShutdownManager,
    save_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let population = Population::new(&config)?;
        Ok(Self::from_population(config, population))
    }

    /// Restores the population from a snapshot file.
    pub fn load(config: AppConfig, path: &std::path::Path) -> Result<Self> {
        let population = biolume_io::persistence::load_population(path, &config)
            .with_context(|| format!("loading snapshot {}", path.display()))?;
        Ok(Self::from_population(config, population))
    }

    pub fn from_population(config: AppConfig, population: Population) -> Self {
        let metrics = Arc::new(Metrics::new(config.runtime.log_interval));
        Self {
            config,
            population,
            metrics,
            shutdown: ShutdownManager::new(),
            save_path: None,
        }
    }

    #[must_use]
    pub fn with_save_path(mut self, path: Option<PathBuf>) -> Self {
        self.save_path = path;
        self
    }

    pub fn run_generation(&mut self) -> TickReport {
        let start = Instant::now();
        let report = self.population.tick();
        self.metrics.record_tick(&report, start.elapsed());
        report
    }

    /// Runs generations until the limit is reached or shutdown is requested,
    /// then performs cleanup.
    pub async fn run(&mut self) -> Result<()> {
        self.shutdown.listen_for_ctrl_c();
        let runtime = self.config.runtime.clone();
        let shutdown = self.shutdown.clone();
        let completed = run_paced(&runtime, &shutdown, || {
            self.run_generation();
        })
        .await;

        tracing::info!(
            generations = completed,
            reproductions = self.metrics.reproductions(),
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Run finished"
        );
        self.shutdown.cleanup(self)
    }

    /// Writes a snapshot to the save path, if one was given.
    pub fn save_state(&self) -> Result<()> {
        let Some(path) = &self.save_path else {
            return Ok(());
        };
        biolume_io::persistence::save_population(&self.population, &self.config, path)
            .with_context(|| format!("saving snapshot {}", path.display()))
    }
}

/// Node-mode runner: a ring of standalone nodes exchanging genes.
pub async fn run_nodes(config: &AppConfig, count: usize) -> Result<()> {
    let metrics = Arc::new(Metrics::new(config.runtime.log_interval));
    let mut ring = NodeRing::new(count, config, metrics.clone())?;
    let shutdown = ShutdownManager::new();
    shutdown.listen_for_ctrl_c();

    let completed = run_paced(&config.runtime, &shutdown, || {
        ring.tick();
    })
    .await;

    tracing::info!(
        ticks = completed,
        transfers = metrics.transfers(),
        transfer_failures = metrics.transfer_failures(),
        "Node run finished"
    );
    Ok(())
}

/// Calls `step` once per `tick_delay_ms` until `max_generations` steps have
/// run or shutdown is requested. Returns the number of steps run.
pub async fn run_paced<F>(runtime: &RuntimeConfig, shutdown: &ShutdownManager, mut step: F) -> u64
where
    F: FnMut(),
{
    let mut interval = (runtime.tick_delay_ms > 0)
        .then(|| tokio::time::interval(Duration::from_millis(runtime.tick_delay_ms)));
    let mut completed = 0;

    while !shutdown.is_shutdown_requested() {
        if runtime.max_generations.is_some_and(|max| completed >= max) {
            break;
        }
        match interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => tokio::task::yield_now().await,
        }
        step();
        completed += 1;
    }
    completed
}
