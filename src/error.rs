//! Error types for the bag query layer
//!
//! Every failure is terminal for the call that produced it; there are no
//! retries anywhere in the crate.

use thiserror::Error;

/// Errors surfaced by bag readers and the query engine
#[derive(Error, Debug)]
pub enum BagError {
    /// The bag file or its summary metadata could not be read or parsed
    #[error("Corrupt log: {0}")]
    CorruptLog(String),

    /// Requested channel name is not present in the bag
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Nearest-by-time query against a channel with zero records
    #[error("Channel has no records: {0}")]
    EmptyChannel(String),

    /// Payload-time query against a channel whose payload type carries no
    /// embedded timestamp. Log-time queries never raise this.
    #[error("Payload type carries no timestamp on channel: {0}")]
    PayloadTimeUnavailable(String),

    /// Position query out of bounds (negative positions included)
    #[error("Index {index} out of range for channel {channel} with {len} records")]
    IndexOutOfRange {
        channel: String,
        index: i64,
        len: usize,
    },

    /// I/O failure in a file-backed reader
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BagError {
    fn from(err: serde_json::Error) -> Self {
        BagError::CorruptLog(err.to_string())
    }
}

/// Result type alias for bag operations
pub type BagResult<T> = Result<T, BagError>;
