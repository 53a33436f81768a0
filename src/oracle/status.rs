//! Flight status codes, request keys and per-request tallies.

use crate::consensus::quorum::VoteSet;
use crate::core::{Address, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Real-world status of a flight as reported by oracles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl FlightStatus {
    /// All recognised statuses, in code order.
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    /// Numeric wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable label, as shown by the status front end.
    pub fn label(self) -> &'static str {
        match self {
            FlightStatus::Unknown => "Unknown",
            FlightStatus::OnTime => "On Time",
            FlightStatus::LateAirline => "Late Airline",
            FlightStatus::LateWeather => "Late Weather",
            FlightStatus::LateTechnical => "Late Technical",
            FlightStatus::LateOther => "Late Other",
        }
    }
}

impl TryFrom<u8> for FlightStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        FlightStatus::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or(Error::InvalidStatusCode(code))
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Identifies one flight arrival: (airline, flight code, arrival timestamp).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: Address,
    pub flight: String,
    /// Arrival time, seconds since the Unix epoch
    pub timestamp: u64,
}

impl FlightKey {
    pub fn new(airline: Address, flight: &str, timestamp: u64) -> Self {
        Self {
            airline,
            flight: flight.to_string(),
            timestamp,
        }
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.flight, self.timestamp)
    }
}

/// Aggregated oracle responses for one flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatusRequest {
    pub key: FlightKey,
    /// The one index responses must carry to be tallied
    pub open_index: u8,
    /// Who opened the request
    pub requester: Address,
    /// Distinct reporting oracles per status
    pub responses: BTreeMap<FlightStatus, VoteSet>,
    /// First status to reach quorum
    pub final_status: Option<FlightStatus>,
    pub is_open: bool,
}

impl FlightStatusRequest {
    pub fn new(key: FlightKey, open_index: u8, requester: Address) -> Self {
        Self {
            key,
            open_index,
            requester,
            responses: BTreeMap::new(),
            final_status: None,
            is_open: true,
        }
    }

    /// Number of distinct oracles that reported `status`.
    pub fn response_count(&self, status: FlightStatus) -> usize {
        self.responses.get(&status).map(VoteSet::len).unwrap_or(0)
    }

    /// Whether `oracle` already reported, under any status.
    pub fn has_reported(&self, oracle: &Address) -> bool {
        self.responses.values().any(|votes| votes.contains(oracle))
    }
}
