//! Error types for tally

use thiserror::Error;

/// Core tally errors
#[derive(Error, Debug)]
pub enum TallyError {
    // Lookup errors
    #[error("Unknown counter {name} in group {group}")]
    UnknownCounter { group: &'static str, name: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Merge errors
    #[error("Missing {0}")]
    MissingGroup(&'static str),

    // Wire errors
    #[error("Counter ordinal {ordinal} out of range for group {group} with {cardinality} slots")]
    OrdinalOutOfRange {
        group: &'static str,
        ordinal: usize,
        cardinality: usize,
    },

    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Variable-length value {0} does not fit in an integer")]
    VarIntOverflow(i64),

    // Stream errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tally operations
pub type TallyResult<T> = Result<T, TallyError>;
