//! Error types for Ordex.

use std::fmt;

/// The main error type for Ordex index operations.
///
/// `DuplicateKey` and `KeyNotFound` are ordinary, recoverable outcomes: the
/// structure is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Insert of a key that is already present
    DuplicateKey,

    /// Delete (or lookup) of a key that is not present
    KeyNotFound,

    /// Construction parameters out of range
    InvalidConfig(String),

    /// Malformed caller input (key text, range text, unsupported operation)
    InvalidInput(String),
}

impl Error {
    /// Returns true for the two outcomes that leave the structure untouched
    /// and are expected during normal use.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::DuplicateKey | Error::KeyNotFound)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateKey => write!(f, "Key already exists"),
            Error::KeyNotFound => write!(f, "Key not found"),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for Ordex operations.
pub type Result<T> = std::result::Result<T, Error>;
