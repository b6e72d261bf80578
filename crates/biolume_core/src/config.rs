//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections mapping to `config.toml`. Every section has a
//! default, so a file only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [population]
//! topology = "grid"
//! width = 10
//! height = 3
//! seed = 42
//!
//! [energy]
//! max = 100
//! decay = 1
//!
//! [runtime]
//! tick_delay_ms = 250
//! ```

use biolume_data::{Sensor, GEN_INIT, GEN_MAX, GEN_MIN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Population layout.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// A plain list; MESSAGE_SEND has no recipients.
    Flat,
    /// A toroidal grid with Moore-neighbourhood messaging.
    #[default]
    Grid,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    pub topology: TopologyKind,
    /// Member count for the flat layout.
    pub size: usize,
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    /// Guarantee every initial genome carries a REPRODUCE instruction.
    pub seed_viable: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            topology: TopologyKind::Grid,
            size: 4,
            width: 10,
            height: 3,
            seed: None,
            seed_viable: false,
        }
    }
}

impl PopulationConfig {
    /// Number of organisms implied by the layout.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        match self.topology {
            TopologyKind::Flat => self.size,
            TopologyKind::Grid => self.width * self.height,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    pub min_size: usize,
    pub max_size: usize,
    pub init_size: usize,
    /// Exclusive upper bound for randomly initialized actuator variables.
    pub variable_max: i32,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            min_size: GEN_MIN,
            max_size: GEN_MAX,
            init_size: GEN_INIT,
            variable_max: 127,
        }
    }
}

/// Per-reproduction-event edit probabilities.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MutationConfig {
    pub copy_rate: f32,
    pub insert_rate: f32,
    pub delete_rate: f32,
}

impl MutationConfig {
    /// Rates derived from the initial genome size: copy is `1/init`, and
    /// insertion and deletion are each `copy / 2.2`.
    #[must_use]
    pub fn for_init_size(init_size: usize) -> Self {
        let copy_rate = 1.0 / init_size.max(1) as f32;
        Self {
            copy_rate,
            insert_rate: copy_rate / 2.2,
            delete_rate: copy_rate / 2.2,
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self::for_init_size(GEN_INIT)
    }
}

/// Energy credited when a sensor reads true. All zero by default.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SensorRewards {
    pub motion: i32,
    pub sound: i32,
    pub touch: i32,
    pub co2: i32,
}

impl SensorRewards {
    #[must_use]
    pub fn reward(&self, sensor: Sensor) -> i32 {
        match sensor {
            Sensor::Motion => self.motion,
            Sensor::Sound => self.sound,
            Sensor::Touch => self.touch,
            Sensor::Co2 => self.co2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EnergyConfig {
    pub max: i32,
    /// Subtracted on every executed (non-skipped) step. Energy never drops below 0.
    pub decay: i32,
    pub rewards: SensorRewards,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            max: 100,
            decay: 1,
            rewards: SensorRewards::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReproductionConfig {
    pub prob_min: f32,
    pub prob_max: f32,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            prob_min: 0.1,
            prob_max: 0.8,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SensorMode {
    /// Each poll is a Bernoulli draw from the simulation stream.
    #[default]
    Coin,
    /// Each sensor always returns its configured reading.
    Fixed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FixedReadings {
    pub motion: bool,
    pub sound: bool,
    pub touch: bool,
    pub co2: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SensorConfig {
    pub mode: SensorMode,
    /// Probability of a true reading in coin mode.
    pub probability: f64,
    pub fixed: FixedReadings,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            mode: SensorMode::Coin,
            probability: 0.5,
            fixed: FixedReadings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Pause between generations.
    pub tick_delay_ms: u64,
    /// Generations between summary log lines.
    pub log_interval: u64,
    pub max_generations: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: 1000,
            log_interval: 100,
            max_generations: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub population: PopulationConfig,
    pub genome: GenomeConfig,
    pub mutation: MutationConfig,
    pub energy: EnergyConfig,
    pub reproduction: ReproductionConfig,
    pub sensors: SensorConfig,
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    /// Four organisms in a list, no energy decay, coin-flip sensors.
    #[must_use]
    pub fn flat_variant() -> Self {
        Self {
            population: PopulationConfig {
                topology: TopologyKind::Flat,
                size: 4,
                ..Default::default()
            },
            energy: EnergyConfig {
                decay: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A 10x3 torus with neighbour messaging and energy decay.
    #[must_use]
    pub fn grid_variant() -> Self {
        Self::default()
    }

    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        let pop = &self.population;
        match pop.topology {
            TopologyKind::Flat => {
                anyhow::ensure!(pop.size > 0, "Population size must be positive");
                anyhow::ensure!(
                    pop.size <= 100_000,
                    "Population size too large (max 100000)"
                );
            }
            TopologyKind::Grid => {
                anyhow::ensure!(pop.width > 0, "Grid width must be positive");
                anyhow::ensure!(pop.width <= 1000, "Grid width too large (max 1000)");
                anyhow::ensure!(pop.height > 0, "Grid height must be positive");
                anyhow::ensure!(pop.height <= 1000, "Grid height too large (max 1000)");
            }
        }

        let genome = &self.genome;
        anyhow::ensure!(genome.min_size > 0, "Minimum genome size must be positive");
        anyhow::ensure!(
            genome.min_size <= genome.init_size && genome.init_size <= genome.max_size,
            "Genome sizes must satisfy min <= init <= max"
        );
        anyhow::ensure!(
            genome.max_size <= GEN_MAX,
            "Maximum genome size exceeds tape capacity ({GEN_MAX})"
        );
        anyhow::ensure!(
            genome.variable_max > 0,
            "Variable maximum must be positive"
        );

        let m = &self.mutation;
        for (name, rate) in [
            ("Copy", m.copy_rate),
            ("Insert", m.insert_rate),
            ("Delete", m.delete_rate),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&rate),
                "{name} mutation rate must be in [0.0, 1.0]"
            );
        }

        anyhow::ensure!(self.energy.max > 0, "Energy maximum must be positive");
        anyhow::ensure!(self.energy.decay >= 0, "Energy decay must be non-negative");
        let r = &self.energy.rewards;
        anyhow::ensure!(
            r.motion >= 0 && r.sound >= 0 && r.touch >= 0 && r.co2 >= 0,
            "Sensor rewards must be non-negative"
        );

        let repro = &self.reproduction;
        anyhow::ensure!(
            (0.0..=1.0).contains(&repro.prob_min) && (0.0..=1.0).contains(&repro.prob_max),
            "Reproduction probabilities must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            repro.prob_min <= repro.prob_max,
            "Reproduction prob_min must not exceed prob_max"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.sensors.probability),
            "Sensor probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.runtime.log_interval > 0,
            "Log interval must be positive"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Hash of every parameter that affects evolution, for run logs and snapshots.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.population.topology).as_bytes());
        hasher.update(format!("{:?}", self.genome).as_bytes());
        hasher.update(format!("{:?}", self.mutation).as_bytes());
        hasher.update(format!("{:?}", self.energy).as_bytes());
        hasher.update(format!("{:?}", self.reproduction).as_bytes());
        hasher.update(format!("{:?}", self.sensors).as_bytes());
        hex::encode(hasher.finalize())
    }
}
