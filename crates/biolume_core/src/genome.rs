use biolume_data::{Actuator, Genome, Instruction, GENOME_CAPACITY};
use rand::RngCore;

use crate::random::RandomSource;

/// Random construction for [`Genome`].
pub trait GenomeLogic {
    /// Sets the size to `exec_size` (clamped to `[0, GEN_MAX]`), fills the live
    /// region with uniform opcodes and the variables with values in `[0, variable_max)`.
    fn randomize<R: RngCore + ?Sized>(&mut self, exec_size: usize, variable_max: i32, rng: &mut R);

    fn new_random_with_rng<R: RngCore + ?Sized>(
        exec_size: usize,
        variable_max: i32,
        rng: &mut R,
    ) -> Self;
}

/// A uniform opcode from the catalogue.
pub fn random_opcode<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
    rng.rand_int(Instruction::COUNT) as u8
}

impl GenomeLogic for Genome {
    fn randomize<R: RngCore + ?Sized>(&mut self, exec_size: usize, variable_max: i32, rng: &mut R) {
        let size = exec_size.min(GENOME_CAPACITY);
        let ops: Vec<u8> = (0..size).map(|_| random_opcode(rng)).collect();
        self.overwrite(&ops);
        let bound = variable_max.max(1) as usize;
        for act in Actuator::ALL {
            self.variables[act] = rng.rand_int(bound) as i32;
        }
    }

    fn new_random_with_rng<R: RngCore + ?Sized>(
        exec_size: usize,
        variable_max: i32,
        rng: &mut R,
    ) -> Self {
        let mut genome = Genome::new_nop(0);
        genome.randomize(exec_size, variable_max, rng);
        genome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;
    use biolume_data::GEN_MAX;

    #[test]
    fn test_randomize_clamps_size() {
        let (mut rng, _) = seeded_rng(Some(11));
        let g = Genome::new_random_with_rng(500, 127, &mut rng);
        assert_eq!(g.len(), GEN_MAX);
        let g = Genome::new_random_with_rng(0, 127, &mut rng);
        assert!(g.is_empty());
    }

    #[test]
    fn test_randomize_ranges() {
        let (mut rng, _) = seeded_rng(Some(11));
        for _ in 0..100 {
            let g = Genome::new_random_with_rng(10, 127, &mut rng);
            assert_eq!(g.len(), 10);
            assert!(g
                .instructions()
                .iter()
                .all(|&b| Instruction::decode(b).is_some()));
            assert!(g.variables.0.iter().all(|&v| (0..127).contains(&v)));
        }
    }
}
