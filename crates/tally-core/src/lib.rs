//! tally Core - Fundamental types shared by every tally crate
//!
//! This crate defines:
//! - The error type used across encoding, lookup and merge
//! - The enumeration-as-schema trait that binds a counter group to a
//!   fixed, ordered set of counter slots
//! - The built-in framework counter enumerations

pub mod builtin;
pub mod error;
pub mod schema;

pub use builtin::*;
pub use error::*;
pub use schema::*;
