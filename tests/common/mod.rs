pub mod macros;

use biolume_lib::model::actuator::ActuatorBank;
use biolume_lib::model::config::{AppConfig, TopologyKind};
use biolume_lib::model::genome::Genome;
use biolume_lib::model::instruction::Instruction;
use biolume_lib::model::organism::Biolume;
use biolume_lib::model::population::Population;
use biolume_lib::model::sensors::{FixedSensors, SensorOracle};

type OrganismMod = Box<dyn FnOnce(&mut Biolume)>;

#[allow(dead_code)]
pub struct PopulationBuilder {
    config: AppConfig,
    mods: Vec<(usize, OrganismMod)>,
    sensors: Option<Box<dyn SensorOracle>>,
    silent: bool,
}

#[allow(dead_code)]
impl PopulationBuilder {
    /// Flat list of four, seeded.
    pub fn new() -> Self {
        let mut config = AppConfig::flat_variant();
        config.population.seed = Some(42);
        Self {
            config,
            mods: Vec::new(),
            sensors: None,
            silent: false,
        }
    }

    pub fn flat(mut self, size: usize) -> Self {
        self.config.population.topology = TopologyKind::Flat;
        self.config.population.size = size;
        self
    }

    pub fn grid(mut self, width: usize, height: usize) -> Self {
        self.config.population.topology = TopologyKind::Grid;
        self.config.population.width = width;
        self.config.population.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.population.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    /// Turns every mutation off so copies are exact.
    pub fn without_mutation(self) -> Self {
        self.with_config(|c| {
            c.mutation.copy_rate = 0.0;
            c.mutation.insert_rate = 0.0;
            c.mutation.delete_rate = 0.0;
        })
    }

    pub fn with_organism<F>(mut self, index: usize, modifier: F) -> Self
    where
        F: FnOnce(&mut Biolume) + 'static,
    {
        self.mods.push((index, Box::new(modifier)));
        self
    }

    /// Replaces organism `index` with a fresh one running `program`.
    pub fn with_program(self, index: usize, program: &[Instruction], variables: [i32; 3]) -> Self {
        let genome = Genome::from_instructions(program, ActuatorBank::from(variables));
        self.with_organism(index, move |b| b.install_genome(genome))
    }

    pub fn with_ages(mut self, ages: &[u64]) -> Self {
        for (index, &age) in ages.iter().enumerate() {
            self.mods.push((index, Box::new(move |b: &mut Biolume| b.age = age)));
        }
        self
    }

    /// Starts every organism on an all-NOP genome before other edits apply.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn with_sensors(mut self, sensors: FixedSensors) -> Self {
        self.sensors = Some(Box::new(sensors));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> Population {
        let mut population =
            Population::new(&self.config).expect("Failed to create population in test builder");
        if self.silent {
            let size = self.config.genome.init_size;
            for b in population.organisms_mut() {
                b.install_genome(Genome::new_nop(size));
            }
        }
        for (index, modifier) in self.mods {
            modifier(&mut population.organisms_mut()[index]);
        }
        if let Some(sensors) = self.sensors {
            population.set_sensors(sensors);
        }
        population
    }
}
