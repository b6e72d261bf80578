//! Mutation engine applied to a daughter genome once per reproduction event.
//!
//! Order is fixed: deletion, instruction copy mutation, variable copy mutation,
//! insertion. Every edit is an independent Bernoulli trial and the executable
//! size always stays within the configured limits.

use biolume_data::{Actuator, Genome, Instruction};
use rand::RngCore;

use crate::config::{GenomeConfig, MutationConfig};
use crate::genome::random_opcode;
use crate::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRates {
    pub copy: f32,
    pub insert: f32,
    pub delete: f32,
}

impl From<&MutationConfig> for MutationRates {
    fn from(c: &MutationConfig) -> Self {
        Self {
            copy: c.copy_rate,
            insert: c.insert_rate,
            delete: c.delete_rate,
        }
    }
}

/// Executable size bounds preserved by structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min: usize,
    pub max: usize,
}

impl From<&GenomeConfig> for SizeLimits {
    fn from(c: &GenomeConfig) -> Self {
        Self {
            min: c.min_size,
            max: c.max_size,
        }
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::from(&GenomeConfig::default())
    }
}

/// Record of the edits made by one [`mutate`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationReport {
    pub deleted_at: Option<usize>,
    pub instructions_rewritten: usize,
    pub variables_perturbed: usize,
    pub inserted_at: Option<usize>,
}

impl MutationReport {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// Runs the four edits in order.
pub fn mutate<R: RngCore + ?Sized>(
    genome: &mut Genome,
    rates: &MutationRates,
    limits: &SizeLimits,
    rng: &mut R,
) -> MutationReport {
    MutationReport {
        deleted_at: delete_mutation(genome, rates.delete, limits, rng),
        instructions_rewritten: instruction_copy_mutation(genome, rates.copy, rng),
        variables_perturbed: variable_copy_mutation(genome, rates.copy, rng),
        inserted_at: insert_mutation(genome, rates.insert, limits, rng),
    }
}

/// With probability `rate`, and only above the minimum size, removes one
/// uniformly chosen instruction.
pub fn delete_mutation<R: RngCore + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    limits: &SizeLimits,
    rng: &mut R,
) -> Option<usize> {
    if rng.uniform() < rate && genome.len() > limits.min {
        let index = rng.rand_int(genome.len());
        genome.remove_at(index).ok().map(|_| index)
    } else {
        None
    }
}

/// Rewrites each live instruction with probability `rate`.
pub fn instruction_copy_mutation<R: RngCore + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    rng: &mut R,
) -> usize {
    let mut rewritten = 0;
    for index in 0..genome.len() {
        if rng.uniform() < rate {
            let opcode = random_opcode(rng);
            if genome.set(index, opcode).is_ok() {
                rewritten += 1;
            }
        }
    }
    rewritten
}

/// Perturbs each variable with probability `rate` by `gaussian * 10 - 5`.
///
/// The sum is computed in `f32` and truncated toward zero. No clamping: values
/// drift freely and wrap when written to an 8-bit actuator.
pub fn variable_copy_mutation<R: RngCore + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    rng: &mut R,
) -> usize {
    let mut perturbed = 0;
    for act in Actuator::ALL {
        if rng.uniform() < rate {
            let delta = rng.gaussian() * 10.0 - 5.0;
            let var = &mut genome.variables[act];
            *var = (*var as f32 + delta) as i32;
            perturbed += 1;
        }
    }
    perturbed
}

/// With probability `rate`, and only below the maximum size, inserts a random
/// opcode at a uniform index of the grown tape.
pub fn insert_mutation<R: RngCore + ?Sized>(
    genome: &mut Genome,
    rate: f32,
    limits: &SizeLimits,
    rng: &mut R,
) -> Option<usize> {
    if rng.uniform() < rate && genome.len() < limits.max {
        let index = rng.rand_int(genome.len() + 1);
        let opcode = random_opcode(rng);
        genome.insert_at(index, opcode).ok().map(|_| index)
    } else {
        None
    }
}

/// Ensures the genome can reproduce.
///
/// If no REPRODUCE is present, one is inserted at a random index, or written
/// over that index when the tape is already at the maximum size. Returns
/// whether the genome changed.
pub fn make_viable<R: RngCore + ?Sized>(genome: &mut Genome, limits: &SizeLimits, rng: &mut R) -> bool {
    if genome.contains(Instruction::Reproduce) {
        return false;
    }
    let index = rng.rand_int(genome.len());
    let opcode = Instruction::Reproduce.opcode();
    if genome.len() < limits.max {
        genome.insert_at(index, opcode).is_ok()
    } else {
        genome.set(index, opcode).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeLogic;
    use crate::random::seeded_rng;
    use biolume_data::{ActuatorBank, GEN_MAX, GEN_MIN};

    const ALWAYS: MutationRates = MutationRates {
        copy: 1.0,
        insert: 1.0,
        delete: 1.0,
    };
    const NEVER: MutationRates = MutationRates {
        copy: 0.0,
        insert: 0.0,
        delete: 0.0,
    };

    #[test]
    fn test_zero_rates_leave_genome_untouched() {
        let (mut rng, _) = seeded_rng(Some(1));
        let mut g = Genome::new_random_with_rng(10, 127, &mut rng);
        let before = g.clone();
        let report = mutate(&mut g, &NEVER, &SizeLimits::default(), &mut rng);
        assert!(report.is_unchanged());
        assert_eq!(g, before);
    }

    #[test]
    fn test_deletion_respects_minimum() {
        let (mut rng, _) = seeded_rng(Some(2));
        let mut g = Genome::new_nop(GEN_MIN);
        assert_eq!(delete_mutation(&mut g, 1.0, &SizeLimits::default(), &mut rng), None);
        assert_eq!(g.len(), GEN_MIN);
    }

    #[test]
    fn test_insertion_respects_maximum() {
        let (mut rng, _) = seeded_rng(Some(3));
        let mut g = Genome::new_nop(GEN_MAX);
        assert_eq!(insert_mutation(&mut g, 1.0, &SizeLimits::default(), &mut rng), None);
        assert_eq!(g.len(), GEN_MAX);
    }

    #[test]
    fn test_certain_structural_edits() {
        let (mut rng, _) = seeded_rng(Some(4));
        let mut g = Genome::new_nop(10);
        let report = mutate(&mut g, &ALWAYS, &SizeLimits::default(), &mut rng);
        assert!(report.deleted_at.is_some());
        assert!(report.inserted_at.is_some());
        assert_eq!(report.instructions_rewritten, 9);
        assert_eq!(report.variables_perturbed, 3);
        assert_eq!(g.len(), 10);
    }

    #[test]
    fn test_insertion_index_covers_end() {
        let (mut rng, _) = seeded_rng(Some(5));
        let mut seen_end = false;
        for _ in 0..500 {
            let mut g = Genome::new_nop(6);
            if insert_mutation(&mut g, 1.0, &SizeLimits::default(), &mut rng) == Some(6) {
                seen_end = true;
            }
            assert_eq!(g.len(), 7);
        }
        assert!(seen_end, "insertion may append past the old tail");
    }

    #[test]
    fn test_variable_drift_is_unclamped() {
        let (mut rng, _) = seeded_rng(Some(6));
        let mut g = Genome::from_instructions(&[], ActuatorBank::from([0, 0, 0]));
        for _ in 0..200 {
            variable_copy_mutation(&mut g, 1.0, &mut rng);
        }
        // mean drift is -5 per application
        assert!(g.variables.0.iter().all(|&v| v < -255));
    }

    #[test]
    fn test_make_viable_inserts_reproduce() {
        let (mut rng, _) = seeded_rng(Some(7));
        let mut g = Genome::new_nop(8);
        assert!(make_viable(&mut g, &SizeLimits::default(), &mut rng));
        assert!(g.contains(Instruction::Reproduce));
        assert_eq!(g.len(), 9);
        assert!(!make_viable(&mut g, &SizeLimits::default(), &mut rng));
    }

    #[test]
    fn test_make_viable_overwrites_when_full() {
        let (mut rng, _) = seeded_rng(Some(8));
        let mut g = Genome::new_nop(GEN_MAX);
        assert!(make_viable(&mut g, &SizeLimits::default(), &mut rng));
        assert_eq!(g.len(), GEN_MAX);
        assert!(g.contains(Instruction::Reproduce));
    }
}
