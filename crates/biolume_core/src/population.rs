//! Population and replacement scheduler.
//!
//! A generation is one [`Population::step_all`] followed by one
//! [`Population::reproduce_all`]. Reproduction never changes the number of
//! organisms: the oldest member is overwritten in place by a mutated copy of
//! the requesting parent.

use anyhow::ensure;
use biolume_data::Genome;

use crate::config::AppConfig;
use crate::instructions::Effect;
use crate::messaging::MessageBus;
use crate::mutation::{self, MutationRates, MutationReport, SizeLimits};
use crate::organism::{Biolume, ExecContext, ExecParams, StepOutcome};
use crate::random::{seeded_rng, SimRng};
use crate::sensors::{self, SensorOracle};
use crate::topology::Topology;

/// Counts gathered during one step pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub executed: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub broadcasts: usize,
    pub deliveries: usize,
    pub reproduction_requests: usize,
}

/// One slot overwritten during a reproduction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub parent: usize,
    pub target: usize,
    pub mutation: MutationReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Generation number after this tick completed.
    pub generation: u64,
    pub step: StepReport,
    pub replacements: Vec<Replacement>,
}

/// Index of the first organism holding the strictly greatest age.
///
/// Ties resolve to the earliest index in scan order; all-zero ages give 0.
#[must_use]
pub fn oldest_index<I>(ages: I) -> usize
where
    I: IntoIterator<Item = u64>,
{
    let mut best = 0;
    let mut best_age = None;
    for (i, age) in ages.into_iter().enumerate() {
        if best_age.map_or(true, |b| age > b) {
            best = i;
            best_age = Some(age);
        }
    }
    best
}

pub struct Population {
    organisms: Vec<Biolume>,
    topology: Topology,
    rng: SimRng,
    sensors: Box<dyn SensorOracle>,
    params: ExecParams,
    rates: MutationRates,
    limits: SizeLimits,
    init_size: usize,
    variable_max: i32,
    bus: MessageBus,
    generation: u64,
    seed: u64,
}

impl std::fmt::Debug for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("topology", &self.topology)
            .field("generation", &self.generation)
            .field("seed", &self.seed)
            .field("organisms", &self.organisms.len())
            .finish_non_exhaustive()
    }
}

impl Population {
    /// Builds a randomly initialised population from a validated configuration.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let (rng, seed) = seeded_rng(config.population.seed);
        let topology = Topology::from(&config.population);
        let mut pop = Self::assemble(config, topology, Vec::new(), rng, seed);

        let init_size = pop.init_size;
        let variable_max = pop.variable_max;
        for index in 0..topology.len() {
            let mut b = Biolume::new_nop(init_size);
            b.initialize(init_size, variable_max, &mut pop.rng);
            if config.population.seed_viable {
                mutation::make_viable(&mut b.genome, &pop.limits, &mut pop.rng);
            }
            b.location = topology.position(index);
            pop.organisms.push(b);
        }

        tracing::info!(
            organisms = pop.organisms.len(),
            seed,
            topology = ?topology,
            "Population initialised"
        );
        Ok(pop)
    }

    /// Wraps existing organisms. Used by snapshot restore and tests.
    ///
    /// Genome sizes are clamped into the configured bounds and a counter left
    /// past the end restarts at 0.
    pub fn from_organisms(
        config: &AppConfig,
        mut organisms: Vec<Biolume>,
        rng: SimRng,
        seed: u64,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let topology = Topology::from(&config.population);
        ensure!(
            organisms.len() == topology.len(),
            "expected {} organisms for {:?}, got {}",
            topology.len(),
            topology,
            organisms.len()
        );
        let limits = SizeLimits::from(&config.genome);
        let mut clamped = 0;
        for (index, b) in organisms.iter_mut().enumerate() {
            let len = b.genome.len();
            b.genome.clamp_len(limits.min, limits.max);
            if b.genome.len() != len {
                clamped += 1;
            }
            if b.pc >= b.genome.len() {
                b.pc = 0;
            }
            b.location = topology.position(index);
        }
        if clamped > 0 {
            tracing::warn!(clamped, min = limits.min, max = limits.max, "Clamped genome sizes to configured bounds");
        }
        Ok(Self::assemble(config, topology, organisms, rng, seed))
    }

    fn assemble(
        config: &AppConfig,
        topology: Topology,
        organisms: Vec<Biolume>,
        rng: SimRng,
        seed: u64,
    ) -> Self {
        Self {
            organisms,
            topology,
            rng,
            sensors: sensors::from_config(&config.sensors),
            params: ExecParams::from(config),
            rates: MutationRates::from(&config.mutation),
            limits: SizeLimits::from(&config.genome),
            init_size: config.genome.init_size,
            variable_max: config.genome.variable_max,
            bus: MessageBus::new(),
            generation: 0,
            seed,
        }
    }

    /// Replaces the sensor oracle, e.g. with hardware polling.
    #[must_use]
    pub fn with_sensors(mut self, sensors: Box<dyn SensorOracle>) -> Self {
        self.sensors = sensors;
        self
    }

    pub fn set_sensors(&mut self, sensors: Box<dyn SensorOracle>) {
        self.sensors = sensors;
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    #[must_use]
    pub fn organisms(&self) -> &[Biolume] {
        &self.organisms
    }

    /// Direct access for seeding experiments. Cardinality cannot change.
    pub fn organisms_mut(&mut self) -> &mut [Biolume] {
        &mut self.organisms
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Biolume> {
        self.organisms.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn rng(&self) -> &SimRng {
        &self.rng
    }

    /// Steps every organism once in index order, then delivers the broadcasts
    /// raised during the pass.
    pub fn step_all(&mut self) -> StepReport {
        let mut report = StepReport::default();
        let mut ctx = ExecContext {
            rng: &mut self.rng,
            sensors: self.sensors.as_mut(),
            params: &self.params,
        };

        for (index, b) in self.organisms.iter_mut().enumerate() {
            let outcome = b.step(&mut ctx);
            if let StepOutcome::Executed {
                opcode: Some(opcode),
                instruction: None,
                ..
            } = outcome
            {
                report.malformed += 1;
                tracing::trace!(index, opcode, "Malformed opcode executed as NOP");
            }
            match outcome {
                StepOutcome::Skipped => report.skipped += 1,
                StepOutcome::Executed { effect, .. } => {
                    report.executed += 1;
                    match effect {
                        Effect::Broadcast(payload) => {
                            report.broadcasts += 1;
                            self.bus.post(index, payload);
                        }
                        Effect::ReproductionRequested => report.reproduction_requests += 1,
                        Effect::None => {}
                    }
                }
            }
        }

        report.deliveries = self.bus.deliver(&self.topology, &mut self.organisms);
        report
    }

    /// Serves every reproduction request raised before the pass began.
    ///
    /// Each request overwrites the then-current oldest organism, so a slot
    /// replaced earlier in the pass can be chosen again. A requester that was
    /// itself replaced loses its request.
    pub fn reproduce_all(&mut self) -> Vec<Replacement> {
        let requesters: Vec<usize> = self
            .organisms
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.reproduce.then_some(i))
            .collect();

        let mut replacements = Vec::with_capacity(requesters.len());
        for parent in requesters {
            if !self.organisms[parent].reproduce {
                continue;
            }
            let target = oldest_index(self.organisms.iter().map(|b| b.age));
            let mutation = self.replace(parent, target);
            tracing::debug!(parent, target, ?mutation, "Replaced oldest organism");
            replacements.push(Replacement {
                parent,
                target,
                mutation,
            });
        }
        replacements
    }

    /// Overwrites `target` with a mutated copy of `parent`'s genome.
    fn replace(&mut self, parent: usize, target: usize) -> MutationReport {
        let genome: Genome = self.organisms[parent].genome.clone();
        self.organisms[parent].reproduce = false;

        let slot = &mut self.organisms[target];
        slot.initialize(self.init_size, self.variable_max, &mut self.rng);
        slot.genome.replace_from(&genome);
        let report = mutation::mutate(&mut slot.genome, &self.rates, &self.limits, &mut self.rng);
        slot.age = 0;
        report
    }

    /// One full generation.
    pub fn tick(&mut self) -> TickReport {
        let step = self.step_all();
        let replacements = self.reproduce_all();
        self.generation += 1;
        TickReport {
            generation: self.generation,
            step,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::FixedSensors;
    use biolume_data::{ActuatorBank, Instruction};

    fn flat_config(size: usize, seed: u64) -> AppConfig {
        let mut config = AppConfig::flat_variant();
        config.population.size = size;
        config.population.seed = Some(seed);
        config
    }

    #[test]
    fn test_oldest_first_max_wins() {
        assert_eq!(oldest_index([3, 7, 2, 7]), 1);
        assert_eq!(oldest_index([0, 0, 0]), 0);
        assert_eq!(oldest_index([1, 2, 9]), 2);
        assert_eq!(oldest_index(Vec::<u64>::new()), 0);
    }

    #[test]
    fn test_new_population_has_configured_cardinality() {
        let pop = Population::new(&AppConfig::grid_variant()).unwrap();
        assert_eq!(pop.len(), 30);
        assert!(pop.organisms().iter().all(|b| b.location.is_some()));
        assert_eq!(pop.get(4).and_then(|b| b.location).map(|p| (p.x, p.y)), Some((1, 1)));
    }

    #[test]
    fn test_seed_viable_guarantees_reproduce() {
        let mut config = flat_config(8, 3);
        config.population.seed_viable = true;
        let pop = Population::new(&config).unwrap();
        assert!(pop
            .organisms()
            .iter()
            .all(|b| b.genome.contains(Instruction::Reproduce)));
    }

    #[test]
    fn test_from_organisms_rejects_wrong_count() {
        let config = flat_config(4, 1);
        let (rng, seed) = seeded_rng(Some(1));
        assert!(Population::from_organisms(&config, vec![Biolume::new_nop(5); 3], rng, seed).is_err());
    }

    #[test]
    fn test_reproduction_replaces_oldest() {
        let config = flat_config(4, 11);
        let (rng, seed) = seeded_rng(Some(11));
        let mut organisms = vec![Biolume::new_nop(5); 4];
        for (b, age) in organisms.iter_mut().zip([3, 7, 2, 7]) {
            b.age = age;
        }
        let parent_genome =
            Genome::from_instructions(&[Instruction::Led0On; 8], ActuatorBank::from([1, 2, 3]));
        organisms[2].genome = parent_genome.clone();
        organisms[2].reproduce = true;

        let mut pop = Population::from_organisms(&config, organisms, rng, seed).unwrap();
        let replaced = pop.reproduce_all();
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].parent, 2);
        assert_eq!(replaced[0].target, 1);
        assert_eq!(pop.len(), 4);
        assert_eq!(pop.organisms()[1].age, 0);
        assert!(!pop.organisms()[2].reproduce);
        assert_eq!(pop.organisms()[2].genome, parent_genome);
    }

    #[test]
    fn test_parent_replacing_itself() {
        let mut config = flat_config(2, 5);
        config.mutation.copy_rate = 0.0;
        config.mutation.insert_rate = 0.0;
        config.mutation.delete_rate = 0.0;
        let (rng, seed) = seeded_rng(Some(5));
        let mut organisms = vec![Biolume::new_nop(5); 2];
        organisms[0].age = 10;
        organisms[0].reproduce = true;
        organisms[0].genome =
            Genome::from_instructions(&[Instruction::SoundOn; 6], ActuatorBank::from([4, 5, 6]));
        let expected = organisms[0].genome.clone();

        let mut pop = Population::from_organisms(&config, organisms, rng, seed).unwrap();
        let replaced = pop.reproduce_all();
        assert_eq!(replaced[0].target, 0);
        assert_eq!(pop.organisms()[0].genome, expected);
        assert!(!pop.organisms()[0].reproduce);
    }

    #[test]
    fn test_replaced_requester_loses_request() {
        let config = flat_config(3, 9);
        let (rng, seed) = seeded_rng(Some(9));
        let mut organisms = vec![Biolume::new_nop(5); 3];
        organisms[0].reproduce = true;
        organisms[1].reproduce = true;
        organisms[1].age = 50;

        let mut pop = Population::from_organisms(&config, organisms, rng, seed).unwrap();
        let replaced = pop.reproduce_all();
        // organism 0 overwrites organism 1, which then no longer requests
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].target, 1);
    }

    #[test]
    fn test_tick_preserves_cardinality_and_counts_generations() {
        let mut config = flat_config(10, 21);
        config.population.seed_viable = true;
        let mut pop = Population::new(&config).unwrap();
        for _ in 0..200 {
            pop.tick();
            assert_eq!(pop.len(), 10);
        }
        assert_eq!(pop.generation(), 200);
    }

    #[test]
    fn test_message_latency() {
        let mut config = AppConfig::grid_variant();
        config.population.width = 3;
        config.population.height = 3;
        config.population.seed = Some(2);
        let (rng, seed) = seeded_rng(Some(2));

        let payload = ActuatorBank::from([10, 20, 30]);
        let mut organisms = vec![Biolume::new_nop(5); 9];
        let mut sender = Biolume::with_genome(Genome::from_instructions(
            &[Instruction::MessageSend; 5],
            ActuatorBank::default(),
        ));
        sender.displays.buffer = payload;
        organisms[4] = sender;
        organisms[0] = Biolume::with_genome(Genome::from_instructions(
            &[Instruction::MessageReceive; 5],
            ActuatorBank::default(),
        ));

        let mut pop = Population::from_organisms(&config, organisms, rng, seed)
            .unwrap()
            .with_sensors(Box::new(FixedSensors::all(true)));

        let first = pop.step_all();
        assert_eq!(first.broadcasts, 1);
        assert_eq!(first.deliveries, 8);
        // the receiver stepped before delivery; its buffer is still empty
        assert_eq!(pop.organisms()[0].displays.buffer, ActuatorBank::default());
        assert_eq!(pop.organisms()[0].displays.message, payload);

        pop.step_all();
        assert_eq!(pop.organisms()[0].displays.buffer, payload);
    }

    #[test]
    fn test_same_seed_same_history() {
        let config = flat_config(6, 77);
        let mut a = Population::new(&config).unwrap();
        let mut b = Population::new(&config).unwrap();
        for _ in 0..50 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.organisms(), b.organisms());
    }
}
