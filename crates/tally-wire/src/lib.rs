//! tally Wire - Byte streams and variable-length integers
//!
//! This crate implements the primitives counter groups persist with:
//! - `DataOutput` / `DataInput` byte sink and source traits
//! - In-memory (`Vec<u8>`, `BytesMut`, `&[u8]`, `Bytes`) and `std::io` adapters
//! - The sign-aware variable-length integer format (`vint` / `vlong`)

pub mod stream;
pub mod varint;

pub use stream::*;
pub use varint::*;
