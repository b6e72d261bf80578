//! # Biolume IO
//!
//! Everything that crosses the process boundary:
//! - Structured error types for transport and storage
//! - The fixed-length gene packet byte codec
//! - Gene sources and sinks for node-to-node transfer
//! - JSON and HexDNA serialization
//! - Population snapshot files

/// Error types and result aliases for I/O operations
pub mod error;
/// Population snapshot save and load
pub mod persistence;
/// Validated serialization helpers for JSON and HexDNA formats
pub mod serialization;
/// Gene sources and sinks
pub mod transfer;
/// Little-endian byte codec for gene packets
pub mod wire;

pub use error::{IoError, Result};
pub use serialization::{
    from_hex_dna, from_json, genome_from_hex, genome_to_hex, read_json_file,
    to_hex_dna, to_json, to_json_pretty, write_json_file,
};
pub use transfer::{gene_channel, GeneInbox, GeneSink, GeneSource};
