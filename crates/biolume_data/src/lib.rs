pub mod data;

pub use data::actuator::{Actuator, ActuatorBank, Sensor, NUM_ACT};
pub use data::genome::{
    Genome, GenomeError, GENOME_CAPACITY, GENOME_WORDS, GEN_INIT, GEN_MAX, GEN_MIN,
};
pub use data::instruction::Instruction;
pub use data::packet::{GenePacket, PACKET_WORDS};
