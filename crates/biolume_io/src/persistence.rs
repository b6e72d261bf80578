//! Population snapshot files.

use std::path::Path;

use biolume_core::config::AppConfig;
use biolume_core::population::Population;
use biolume_core::snapshot::PopulationSnapshot;

use crate::error::Result;
use crate::serialization::{read_json_file, write_json_file};

/// Captures `population` and writes it to `path` as JSON.
pub fn save_population<P: AsRef<Path>>(
    population: &Population,
    config: &AppConfig,
    path: P,
) -> Result<()> {
    let snapshot = PopulationSnapshot::capture(population, config);
    write_json_file(&snapshot, &path)?;
    tracing::info!(
        path = %path.as_ref().display(),
        generation = snapshot.generation,
        "Population snapshot saved"
    );
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<PopulationSnapshot> {
    read_json_file(path)
}

/// Loads a snapshot and restores it under `config`.
pub fn load_population<P: AsRef<Path>>(path: P, config: &AppConfig) -> anyhow::Result<Population> {
    let snapshot = load_snapshot(&path)?;
    let generation = snapshot.generation;
    let population = snapshot.restore(config)?;
    tracing::info!(
        path = %path.as_ref().display(),
        generation,
        "Population snapshot restored"
    );
    Ok(population)
}
