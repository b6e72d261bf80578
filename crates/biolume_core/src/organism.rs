//! The biolume virtual machine.
//!
//! Each call to [`Biolume::step`] is one tick: either a pending skip is
//! consumed, or the instruction under the program counter is executed. In both
//! cases the counter advances around the circular tape and the age increments.

use biolume_data::{ActuatorBank, Genome, Instruction};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::config::SensorRewards;
use crate::genome::GenomeLogic;
use crate::instructions::{self, Dispatch, Effect, Flow};
use crate::sensors::SensorOracle;
use crate::topology::GridPos;

/// The four parallel actuator buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Displays {
    /// What the actuators show now. Read by rendering and hardware sinks.
    pub current: ActuatorBank<u8>,
    /// `current` as it was before the last executed instruction.
    pub previous: ActuatorBank<u8>,
    /// Scratch buffer for display and messaging.
    pub buffer: ActuatorBank<u8>,
    /// Last message delivered by a neighbour.
    pub message: ActuatorBank<u8>,
}

/// Parameters the dispatcher needs, lifted out of [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ExecParams {
    pub energy_max: i32,
    pub energy_decay: i32,
    pub prob_min: f32,
    pub prob_max: f32,
    pub rewards: SensorRewards,
}

impl Default for ExecParams {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExecParams {
    fn from(config: &AppConfig) -> Self {
        Self {
            energy_max: config.energy.max,
            energy_decay: config.energy.decay,
            prob_min: config.reproduction.prob_min,
            prob_max: config.reproduction.prob_max,
            rewards: config.energy.rewards.clone(),
        }
    }
}

/// Collaborators borrowed for the duration of one step.
pub struct ExecContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub sensors: &'a mut dyn SensorOracle,
    pub params: &'a ExecParams,
}

/// What happened during a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A pending skip was consumed; nothing executed.
    Skipped,
    Executed {
        /// Raw byte under the program counter, `None` on an empty tape.
        opcode: Option<u8>,
        /// Decoded instruction, `None` when the byte is outside the catalogue.
        instruction: Option<Instruction>,
        effect: Effect,
    },
}

impl StepOutcome {
    /// An executed byte that did not decode.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            StepOutcome::Executed {
                opcode: Some(_),
                instruction: None,
                ..
            }
        )
    }
}

/// One organism: genome plus runtime state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biolume {
    pub genome: Genome,
    pub pc: usize,
    pub skip: bool,
    /// Jump target; `None` until a LABEL executes.
    pub label: Option<usize>,
    pub age: u64,
    pub reproduce: bool,
    pub energy: i32,
    pub displays: Displays,
    /// Fixed grid coordinates, present only in the grid layout.
    pub location: Option<GridPos>,
}

impl Default for Biolume {
    fn default() -> Self {
        Self::with_genome(Genome::default())
    }
}

impl Biolume {
    /// All-NOP genome of `size` instructions and zeroed state.
    #[must_use]
    pub fn new_nop(size: usize) -> Self {
        Self::with_genome(Genome::new_nop(size))
    }

    #[must_use]
    pub fn with_genome(genome: Genome) -> Self {
        Self {
            genome,
            pc: 0,
            skip: false,
            label: None,
            age: 0,
            reproduce: false,
            energy: 0,
            displays: Displays::default(),
            location: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: GridPos) -> Self {
        self.location = Some(location);
        self
    }

    /// Clears runtime state. The genome and location are kept.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.skip = false;
        self.label = None;
        self.age = 0;
        self.reproduce = false;
        self.energy = 0;
        self.displays = Displays::default();
    }

    /// Fresh random genome of `exec_size` plus zeroed runtime state.
    pub fn initialize<R: RngCore + ?Sized>(&mut self, exec_size: usize, variable_max: i32, rng: &mut R) {
        self.genome.randomize(exec_size, variable_max, rng);
        self.reset();
    }

    /// Replaces the genome wholesale and restarts execution from `pc = 0`.
    pub fn install_genome(&mut self, genome: Genome) {
        self.genome = genome;
        self.reset();
    }

    /// Overwrites the inbound message slot.
    pub fn set_message(&mut self, message: ActuatorBank<u8>) {
        self.displays.message = message;
    }

    /// Actuator state for display sinks.
    #[must_use]
    pub fn display(&self) -> &ActuatorBank<u8> {
        &self.displays.current
    }

    /// Executes one tick.
    pub fn step(&mut self, ctx: &mut ExecContext<'_>) -> StepOutcome {
        let len = self.genome.len();
        let (flow, outcome) = if self.skip {
            self.skip = false;
            (Flow::Advance, StepOutcome::Skipped)
        } else {
            self.energy = (self.energy - ctx.params.energy_decay).max(0);
            self.displays.previous = self.displays.current;

            let opcode = self.genome.at(self.pc);
            let instruction = opcode.and_then(Instruction::decode);
            let Dispatch { flow, effect } = match instruction {
                Some(inst) => instructions::dispatch(inst, self, ctx),
                None => Dispatch::default(),
            };
            (
                flow,
                StepOutcome::Executed {
                    opcode,
                    instruction,
                    effect,
                },
            )
        };

        self.pc = match (len, flow) {
            (0, _) => 0,
            (_, Flow::Advance) => (self.pc + 1) % len,
            (_, Flow::ResumeAt(target)) => target % len,
        };
        self.age += 1;
        outcome
    }
}
