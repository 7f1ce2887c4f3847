//! tally Group - Sparse enumeration-indexed counter groups
//!
//! This crate implements:
//! - The `Counter` abstraction and enumeration-bound `FrameworkCounter`
//! - `FrameworkCounterGroup`: lazy slot allocation, lookup, merge, iteration
//! - The compact `count (ordinal value)*` group encoding
//! - The `CounterGroupBase` contract used by aggregating containers
//! - Display-name resolution

pub mod base;
pub mod codec;
pub mod counter;
pub mod group;
pub mod names;

pub use base::*;
pub use codec::*;
pub use counter::*;
pub use group::{FrameworkCounterGroup, Iter};
pub use names::*;
