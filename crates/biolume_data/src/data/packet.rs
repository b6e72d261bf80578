use serde::{Deserialize, Serialize};

use super::actuator::{Actuator, ActuatorBank, NUM_ACT};
use super::genome::{Genome, GENOME_CAPACITY, GENOME_WORDS};

/// Words in a gene transfer packet: the flattened genome plus the size word.
pub const PACKET_WORDS: usize = GENOME_WORDS + 1;

/// Fixed-length gene transfer payload.
///
/// Layout: `GENOME_CAPACITY` instruction words, `NUM_ACT` variable words, then
/// the executable size. No framing or versioning beyond the fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenePacket {
    words: [i32; PACKET_WORDS],
}

impl GenePacket {
    #[must_use]
    pub fn from_words(words: [i32; PACKET_WORDS]) -> Self {
        Self { words }
    }

    #[must_use]
    pub fn words(&self) -> &[i32; PACKET_WORDS] {
        &self.words
    }

    /// The raw, untrusted size word.
    #[must_use]
    pub fn size_word(&self) -> i32 {
        self.words[GENOME_WORDS]
    }

    #[must_use]
    pub fn from_genome(genome: &Genome) -> Self {
        let mut words = [0i32; PACKET_WORDS];
        for (word, &byte) in words.iter_mut().zip(genome.tape().iter()) {
            *word = i32::from(byte);
        }
        for act in Actuator::ALL {
            words[GENOME_CAPACITY + act.index()] = genome.variables[act];
        }
        words[GENOME_WORDS] = genome.len() as i32;
        Self { words }
    }

    /// Rebuilds a genome, clamping the size word into `[min, max]`.
    ///
    /// Instruction words that do not fit a byte become `u8::MAX`, which decodes
    /// as an unknown opcode and therefore executes as a no-op.
    #[must_use]
    pub fn to_genome(&self, min: usize, max: usize) -> Genome {
        let mut tape = [0u8; GENOME_CAPACITY];
        for (slot, &word) in tape.iter_mut().zip(self.words.iter()) {
            *slot = u8::try_from(word).unwrap_or(u8::MAX);
        }
        let mut variables = [0i32; NUM_ACT];
        variables.copy_from_slice(&self.words[GENOME_CAPACITY..GENOME_WORDS]);
        let len = usize::try_from(self.size_word()).unwrap_or(0);
        let mut genome = Genome::from_parts(tape, len, ActuatorBank(variables));
        genome.clamp_len(min, max);
        genome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::genome::{GEN_MAX, GEN_MIN};
    use crate::data::instruction::Instruction;

    #[test]
    fn test_layout() {
        let genome = Genome::from_instructions(
            &[Instruction::Reproduce, Instruction::Jump],
            ActuatorBank::from([5, -6, 300]),
        );
        let packet = GenePacket::from_genome(&genome);
        let words = packet.words();
        assert_eq!(words[0], Instruction::Reproduce as i32);
        assert_eq!(words[1], Instruction::Jump as i32);
        assert_eq!(&words[GENOME_CAPACITY..GENOME_WORDS], &[5, -6, 300]);
        assert_eq!(packet.size_word(), 2);
    }

    #[test]
    fn test_size_is_clamped_on_install() {
        let mut words = [0i32; PACKET_WORDS];
        words[GENOME_WORDS] = 999;
        let genome = GenePacket::from_words(words).to_genome(GEN_MIN, GEN_MAX);
        assert_eq!(genome.len(), GEN_MAX);

        words[GENOME_WORDS] = -4;
        let genome = GenePacket::from_words(words).to_genome(GEN_MIN, GEN_MAX);
        assert_eq!(genome.len(), GEN_MIN);
    }

    #[test]
    fn test_malformed_opcodes_map_to_unknown() {
        let mut words = [0i32; PACKET_WORDS];
        words[0] = -1;
        words[1] = 4096;
        words[2] = 40;
        words[GENOME_WORDS] = 6;
        let genome = GenePacket::from_words(words).to_genome(GEN_MIN, GEN_MAX);
        assert_eq!(genome.at(0), Some(u8::MAX));
        assert_eq!(genome.at(1), Some(u8::MAX));
        assert_eq!(genome.at(2), Some(40));
        assert!(Instruction::decode(40).is_none());
    }

    #[test]
    fn test_roundtrip_preserves_genome() {
        let genome = Genome::from_instructions(
            &[Instruction::Led0On; 8],
            ActuatorBank::from([1, 2, 3]),
        );
        let back = GenePacket::from_genome(&genome).to_genome(GEN_MIN, GEN_MAX);
        assert_eq!(back, genome);
    }
}
