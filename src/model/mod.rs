pub use biolume_core::{Biolume, GenomeLogic, Population, RandomSource};
pub mod config {
    pub use biolume_core::config::*;
}
pub mod genome {
    pub use biolume_core::genome::*;
    pub use biolume_data::{Genome, GenomeError, GENOME_CAPACITY, GEN_INIT, GEN_MAX, GEN_MIN};
}
pub mod instruction {
    pub use biolume_core::instructions::*;
    pub use biolume_data::Instruction;
}
pub mod actuator {
    pub use biolume_data::{Actuator, ActuatorBank, Sensor, NUM_ACT};
}
pub mod organism {
    pub use biolume_core::organism::*;
}
pub mod mutation {
    pub use biolume_core::mutation::*;
}
pub mod population {
    pub use biolume_core::population::*;
}
pub mod topology {
    pub use biolume_core::topology::*;
}
pub mod messaging {
    pub use biolume_core::messaging::*;
}
pub mod sensors {
    pub use biolume_core::sensors::*;
}
pub mod snapshot {
    pub use biolume_core::snapshot::*;
}
pub mod random {
    pub use biolume_core::random::*;
}
pub mod metrics {
    pub use biolume_core::metrics::*;
}
pub mod transfer {
    pub use biolume_data::{GenePacket, PACKET_WORDS};
    pub use biolume_io::transfer::*;
    pub use biolume_io::wire;
}
pub mod persistence {
    pub use biolume_io::persistence::*;
    pub use biolume_io::serialization::*;
}
