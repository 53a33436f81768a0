//! Notifications emitted by state-changing operations.

use crate::core::{Address, Amount};
use crate::oracle::FlightStatus;
use serde::{Deserialize, Serialize};

/// An event produced by a successful operation.
///
/// Events are outputs: each operation returns the events it produced and
/// never delivers them itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A member voted to admit a pending candidate
    Voted {
        candidate: Address,
        voter: Address,
        votes: usize,
        required: usize,
    },
    /// An airline became an accepted member
    Registered {
        airline: Address,
        sequence_number: u64,
    },
    /// An airline posted stake
    Funded { airline: Address, amount: Amount },
    /// An oracle joined the pool
    OracleRegistered { oracle: Address, indexes: [u8; 3] },
    /// Oracles holding `index` are asked to report on a flight
    OracleRequest {
        index: u8,
        airline: Address,
        flight: String,
        timestamp: u64,
    },
    /// A single tallied oracle report
    OracleReport {
        oracle: Address,
        airline: Address,
        flight: String,
        timestamp: u64,
        status: FlightStatus,
    },
    /// A flight's status reached quorum
    FlightStatusInfo {
        airline: Address,
        flight: String,
        timestamp: u64,
        status: FlightStatus,
    },
    OperationalStatusChanged { operational: bool },
}

impl Event {
    /// Short name, stable across versions.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Voted { .. } => "Voted",
            Event::Registered { .. } => "Registered",
            Event::Funded { .. } => "Funded",
            Event::OracleRegistered { .. } => "OracleRegistered",
            Event::OracleRequest { .. } => "OracleRequest",
            Event::OracleReport { .. } => "OracleReport",
            Event::FlightStatusInfo { .. } => "FlightStatusInfo",
            Event::OperationalStatusChanged { .. } => "OperationalStatusChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = Event::Registered {
            airline: Address::new([1; 20]),
            sequence_number: 2,
        };
        assert_eq!(event.name(), "Registered");
        assert_eq!(
            Event::OperationalStatusChanged { operational: false }.name(),
            "OperationalStatusChanged"
        );
    }
}
