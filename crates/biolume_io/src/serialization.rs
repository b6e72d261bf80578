//! Serialization utilities with validation.
//!
//! JSON for snapshots and configuration dumps; HexDNA (hex of the JSON text)
//! for passing single genomes around as one token.

use std::path::Path;

use biolume_data::Genome;
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))
}

pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {e}")))
}

pub fn to_hex_dna<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    let json = to_json(data)?;
    Ok(hex::encode(json.as_bytes()))
}

pub fn from_hex_dna<T>(hex_str: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let hex_str = hex_str.trim();
    if hex_str.is_empty() {
        return Err(IoError::validation("Empty hex string"));
    }
    let bytes = hex::decode(hex_str)
        .map_err(|e| IoError::validation(format!("Invalid hex encoding: {e}")))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| IoError::validation(format!("Invalid UTF-8 in hex: {e}")))?;
    from_json(&json)
}

pub fn genome_to_hex(genome: &Genome) -> Result<String> {
    to_hex_dna(genome)
}

/// Decodes a HexDNA genome and clamps its size into `[min, max]`, the same
/// treatment an inbound gene packet gets.
pub fn genome_from_hex(hex_str: &str, min: usize, max: usize) -> Result<Genome> {
    let mut genome: Genome = from_hex_dna(hex_str)?;
    genome.clamp_len(min, max);
    Ok(genome)
}

/// Writes pretty JSON to `path`.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })
}

pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}
