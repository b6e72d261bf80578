//! Biolume: a genetic-programming artificial-life simulator.
//!
//! The engine lives in the workspace crates; this package wires it into a
//! paced runner, a standalone gene-exchanging node mode, and the CLI.

pub mod app;
pub mod model;
