use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actuator::{ActuatorBank, NUM_ACT};
use super::instruction::Instruction;

/// Maximum executable genome size. Also the fixed offset of the variable block.
pub const GEN_MAX: usize = 20;
/// Minimum executable genome size preserved by deletion.
pub const GEN_MIN: usize = 5;
/// Executable size of a freshly initialized genome.
pub const GEN_INIT: usize = 10;
/// Storage slots reserved for instructions. Never reallocated.
pub const GENOME_CAPACITY: usize = GEN_MAX;
/// Flattened genome length: instruction slots followed by the variables.
pub const GENOME_WORDS: usize = GENOME_CAPACITY + NUM_ACT;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenomeError {
    #[error("genome is full (capacity {capacity})")]
    Full { capacity: usize },
    #[error("genome is empty")]
    Empty,
    #[error("index {index} out of bounds for genome of size {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A circular instruction tape plus the actuator default variables.
///
/// Instructions live in a fixed arena of [`GENOME_CAPACITY`] bytes of which the
/// first `len` are live. Structural edits shift within the arena; the variable
/// block is stored separately and is never touched by them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GenomeRepr")]
pub struct Genome {
    tape: [u8; GENOME_CAPACITY],
    len: usize,
    /// Actuator defaults. Drift accumulates in `i32`; values are truncated to a
    /// byte only when copied to a display.
    pub variables: ActuatorBank<i32>,
}

/// Deserialization goes through [`Genome::from_parts`] so a stored size can
/// never exceed the arena.
#[derive(Deserialize)]
struct GenomeRepr {
    tape: [u8; GENOME_CAPACITY],
    len: usize,
    variables: ActuatorBank<i32>,
}

impl From<GenomeRepr> for Genome {
    fn from(r: GenomeRepr) -> Self {
        Self::from_parts(r.tape, r.len, r.variables)
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self::new_nop(GEN_INIT)
    }
}

impl Genome {
    /// A genome of `size` NOPs with zeroed variables.
    #[must_use]
    pub fn new_nop(size: usize) -> Self {
        Self {
            tape: [Instruction::Nop.opcode(); GENOME_CAPACITY],
            len: size.min(GENOME_CAPACITY),
            variables: ActuatorBank::splat(0),
        }
    }

    /// Builds a genome from raw parts. `len` is clamped to the capacity.
    #[must_use]
    pub fn from_parts(tape: [u8; GENOME_CAPACITY], len: usize, variables: ActuatorBank<i32>) -> Self {
        Self {
            tape,
            len: len.min(GENOME_CAPACITY),
            variables,
        }
    }

    /// Builds a genome whose live region is `ops`, truncated to the capacity.
    #[must_use]
    pub fn from_instructions(ops: &[Instruction], variables: ActuatorBank<i32>) -> Self {
        let mut genome = Self::new_nop(0);
        for (slot, op) in genome.tape.iter_mut().zip(ops) {
            *slot = op.opcode();
        }
        genome.len = ops.len().min(GENOME_CAPACITY);
        genome.variables = variables;
        genome
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == GENOME_CAPACITY
    }

    /// The opcode byte at `index`, bounds-checked against the live size.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> Option<u8> {
        if index < self.len {
            Some(self.tape[index])
        } else {
            None
        }
    }

    /// Live instruction bytes.
    #[must_use]
    pub fn instructions(&self) -> &[u8] {
        &self.tape[..self.len]
    }

    /// The whole arena, including slots past the live size.
    #[must_use]
    pub fn tape(&self) -> &[u8; GENOME_CAPACITY] {
        &self.tape
    }

    /// Point edit of a live slot.
    pub fn set(&mut self, index: usize, opcode: u8) -> Result<(), GenomeError> {
        if index >= self.len {
            return Err(GenomeError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        self.tape[index] = opcode;
        Ok(())
    }

    /// Inserts `opcode` at `index` (`index <= len`), shifting the tail right.
    pub fn insert_at(&mut self, index: usize, opcode: u8) -> Result<(), GenomeError> {
        if self.is_full() {
            return Err(GenomeError::Full {
                capacity: GENOME_CAPACITY,
            });
        }
        if index > self.len {
            return Err(GenomeError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        self.tape.copy_within(index..self.len, index + 1);
        self.tape[index] = opcode;
        self.len += 1;
        Ok(())
    }

    /// Removes the slot at `index`, shifting the tail left. Returns the removed byte.
    pub fn remove_at(&mut self, index: usize) -> Result<u8, GenomeError> {
        if self.is_empty() {
            return Err(GenomeError::Empty);
        }
        if index >= self.len {
            return Err(GenomeError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        let removed = self.tape[index];
        self.tape.copy_within(index + 1..self.len, index);
        self.len -= 1;
        Ok(removed)
    }

    /// Overwrites the whole live region and size. Slots past `len` are left untouched.
    pub fn overwrite(&mut self, ops: &[u8]) {
        let len = ops.len().min(GENOME_CAPACITY);
        self.tape[..len].copy_from_slice(&ops[..len]);
        self.len = len;
    }

    /// Clamps the live size into `[min, max]` (and the capacity).
    ///
    /// Inverted bounds collapse onto `max`.
    pub fn clamp_len(&mut self, min: usize, max: usize) {
        let max = max.min(GENOME_CAPACITY);
        self.len = self.len.clamp(min.min(max), max);
    }

    /// Total clone of `parent`: the full arena, the variables and the size.
    pub fn replace_from(&mut self, parent: &Genome) {
        self.tape = parent.tape;
        self.variables = parent.variables;
        self.len = parent.len;
    }

    /// Whether the live region contains `inst`.
    #[must_use]
    pub fn contains(&self, inst: Instruction) -> bool {
        self.instructions().contains(&inst.opcode())
    }

    /// Mnemonic listing of the live region, unknown bytes shown as `?NN`.
    #[must_use]
    pub fn disassemble(&self) -> Vec<String> {
        self.instructions()
            .iter()
            .map(|&b| match Instruction::decode(b) {
                Some(inst) => inst.mnemonic().to_string(),
                None => format!("?{b:02X}"),
            })
            .collect()
    }
}
