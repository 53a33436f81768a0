//! Oracle layer
//!
//! - Oracle pool with deterministic index assignment
//! - Flight status codes and per-flight response tallies

pub mod assignment;
pub mod status;

pub use assignment::{
    check_index_space, derive_indexes, pick_index, OracleRecord, OracleRegistry, MAX_INDEX_SPACE,
    MIN_INDEX_SPACE,
};
pub use status::{FlightKey, FlightStatus, FlightStatusRequest};
