//! Core data structures for the Biolume simulation.

pub mod actuator;
pub mod genome;
pub mod instruction;
pub mod packet;
