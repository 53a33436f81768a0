//! Error types for the surety core.

use crate::core::types::{Address, Amount};
use thiserror::Error;

/// Result type alias for surety operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in surety operations.
///
/// Every failure rejects the whole call; no state is changed by a call that
/// returns one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Authorization errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Contract is currently not operational")]
    NotOperational,

    // Replay and duplicate protection
    #[error("Airline {0} has already applied")]
    AlreadyApplied(Address),

    #[error("Oracle {0} is already registered")]
    AlreadyRegistered(Address),

    #[error("{voter} has already voted for {candidate}")]
    DuplicateVote { voter: Address, candidate: String },

    // Unknown entities
    #[error("Unknown airline: {0}")]
    UnknownAirline(Address),

    #[error("Airline not found: {0}")]
    NotFound(Address),

    #[error("No oracle request for {0}")]
    UnknownRequest(String),

    #[error("Oracle not registered: {0}")]
    NotRegistered(Address),

    // Malformed or late input
    #[error("Insufficient funds: required {required}, provided {provided}")]
    InsufficientFunds { required: Amount, provided: Amount },

    #[error("Invalid flight status code: {0}")]
    InvalidStatusCode(u8),

    #[error("Index {got} does not match open request index {expected}")]
    IndexMismatch { expected: u8, got: u8 },

    #[error("Index {0} is not assigned to the responding oracle")]
    IndexNotAssigned(u8),

    #[error("Request for {key} already closed with status {final_status}")]
    RequestClosed { key: String, final_status: u8 },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Journal integrity violated at sequence {0}")]
    JournalIntegrityViolated(u64),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
