use std::fmt;
use std::io;

use crate::types::Value;

/// Unified error type for the merge crate.
///
/// The in-memory merge never produces one of these. They come from the
/// run files, the option checks, and the demo's I/O.
#[derive(Debug)]
pub enum Error {
    /// IO error from disk or console operations.
    Io(io::Error),
    /// Data corruption detected (CRC mismatch, truncated block).
    Corruption(String),
    /// A run writer was handed a value smaller than the one before it.
    Unsorted { previous: Value, value: Value },
    /// Options that cannot produce a run (e.g. min > max).
    InvalidOptions(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Corruption(msg) => write!(f, "Corruption: {msg}"),
            Error::Unsorted { previous, value } => {
                write!(f, "Unsorted input: {value} follows {previous}")
            }
            Error::InvalidOptions(msg) => write!(f, "Invalid options: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
