//! tally Test Harness - Scenario and property testing for counter groups
//!
//! This crate provides:
//! - A map-backed counter group double for cross-family merges
//! - A seeded fuzzer checking groups against a reference model
//! - Test logging setup
//! - Concurrency and property tests across the tally crates

pub mod fixtures;
pub mod fuzzer;
pub mod logging;

#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod properties;

pub use fixtures::*;
pub use fuzzer::*;
pub use logging::*;
