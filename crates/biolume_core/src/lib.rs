//! # Biolume Core
//!
//! The genetic-programming substrate: a tiny virtual machine executing
//! circular instruction tapes, the mutation engine that edits those tapes, and
//! the generational scheduler that replaces the oldest organism with a mutated
//! copy of whichever organism asks to reproduce.
//!
//! Everything is driven from one seeded ChaCha stream, so a run is fully
//! determined by its seed and configuration.
//!
//! ## Example
//!
//! ```
//! use biolume_core::config::AppConfig;
//! use biolume_core::population::Population;
//!
//! let mut config = AppConfig::grid_variant();
//! config.population.seed = Some(42);
//! let mut population = Population::new(&config).unwrap();
//!
//! let report = population.tick();
//! assert_eq!(report.generation, 1);
//! assert_eq!(population.len(), 30);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Random genome construction
pub mod genome;
/// Instruction semantics
pub mod instructions;
/// Neighbour message delivery
pub mod messaging;
/// Run counters and structured logging
pub mod metrics;
/// Copy, insertion and deletion mutations
pub mod mutation;
/// The per-organism virtual machine
pub mod organism;
/// Population stepping and oldest-replacement reproduction
pub mod population;
/// Seeded generator and sampling helpers
pub mod random;
/// Sensor oracles
pub mod sensors;
/// Serializable population state
pub mod snapshot;
/// Flat and toroidal layouts
pub mod topology;

pub use genome::GenomeLogic;
pub use metrics::{init_logging, Metrics};
pub use organism::Biolume;
pub use population::Population;
pub use random::RandomSource;
