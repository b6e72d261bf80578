//! Run statistics and structured logging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use crate::population::TickReport;

/// Counters updated once per generation and by the gene-transfer layer.
///
/// Atomic so a node's transfer thread and the simulation loop can share one
/// instance behind an `Arc`.
pub struct Metrics {
    generations: AtomicU64,
    reproductions: AtomicU64,
    broadcasts: AtomicU64,
    malformed: AtomicU64,
    transfers: AtomicU64,
    transfer_failures: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Metrics {
    /// `log_interval` is the number of generations between summary lines.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            generations: AtomicU64::new(0),
            reproductions: AtomicU64::new(0),
            broadcasts: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            transfers: AtomicU64::new(0),
            transfer_failures: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Folds one generation into the totals and emits a summary every
    /// `log_interval` generations.
    pub fn record_tick(&self, report: &TickReport, duration: Duration) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        self.reproductions
            .fetch_add(report.replacements.len() as u64, Ordering::Relaxed);
        self.broadcasts
            .fetch_add(report.step.broadcasts as u64, Ordering::Relaxed);
        self.malformed
            .fetch_add(report.step.malformed as u64, Ordering::Relaxed);

        if generation % self.log_interval == 0 {
            tracing::info!(
                generation = report.generation,
                reproductions = self.reproductions(),
                broadcasts = self.broadcasts(),
                malformed = self.malformed(),
                duration_us = duration.as_micros() as u64,
                "Generation summary"
            );
        }
    }

    pub fn record_transfer(&self) {
        self.transfers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transfer_failure(&self, error: &dyn std::fmt::Display) {
        self.count_transfer_failure();
        tracing::warn!(%error, "Gene transfer failed");
    }

    /// Counts a failure that was already reported.
    pub fn count_transfer_failure(&self) {
        self.transfer_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn reproductions(&self) -> u64 {
        self.reproductions.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn broadcasts(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn transfers(&self) -> u64 {
        self.transfers.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn transfer_failures(&self) -> u64 {
        self.transfer_failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Repeated calls are ignored.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
