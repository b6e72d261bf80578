//! Serializable image of a running population.
//!
//! The generator state is captured alongside the organisms, so a restored run
//! continues the exact random stream of the original.

use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::organism::Biolume;
use crate::population::Population;
use crate::random::SimRng;
use crate::topology::Topology;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PopulationSnapshot {
    pub generation: u64,
    pub seed: u64,
    /// [`AppConfig::fingerprint`] of the configuration that produced the run.
    pub fingerprint: String,
    pub topology: Topology,
    pub organisms: Vec<Biolume>,
    pub rng: SimRng,
}

impl PopulationSnapshot {
    #[must_use]
    pub fn capture(population: &Population, config: &AppConfig) -> Self {
        Self {
            generation: population.generation(),
            seed: population.seed(),
            fingerprint: config.fingerprint(),
            topology: population.topology(),
            organisms: population.organisms().to_vec(),
            rng: population.rng().clone(),
        }
    }

    /// Rebuilds a population under `config`.
    ///
    /// The layout must match. A differing fingerprint is allowed, since tuning
    /// rates mid-run is a legitimate experiment, but it is logged.
    pub fn restore(self, config: &AppConfig) -> anyhow::Result<Population> {
        let topology = Topology::from(&config.population);
        ensure!(
            topology == self.topology,
            "snapshot layout {:?} does not match configured {:?}",
            self.topology,
            topology
        );
        let fingerprint = config.fingerprint();
        if fingerprint != self.fingerprint {
            tracing::warn!(
                snapshot = %self.fingerprint,
                current = %fingerprint,
                "Restoring snapshot under a different configuration"
            );
        }

        let mut population = Population::from_organisms(config, self.organisms, self.rng, self.seed)?;
        population.set_generation(self.generation);
        Ok(population)
    }
}
