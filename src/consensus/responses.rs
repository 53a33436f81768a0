//! Oracle response consensus.
//!
//! A flight status request selects one open index. Only oracles holding that
//! index may report, each at most once, and the first status reported by
//! `min_responses` distinct oracles becomes final. A finalized request is
//! closed for good.

use crate::config::OracleConfig;
use crate::core::{Address, Error, Result};
use crate::events::Event;
use crate::oracle::{pick_index, FlightKey, FlightStatus, FlightStatusRequest, OracleRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Flight status requests by flight.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestTable {
    requests: HashMap<FlightKey, FlightStatusRequest>,
    nonce: u64,
}

impl RequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &FlightKey) -> Option<&FlightStatusRequest> {
        self.requests.get(key)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Keys of requests still awaiting quorum.
    pub fn open_keys(&self) -> Vec<FlightKey> {
        let mut keys: Vec<FlightKey> = self
            .requests
            .values()
            .filter(|request| request.is_open)
            .map(|request| request.key.clone())
            .collect();
        keys.sort();
        keys
    }
}

/// Quorum tallying over a [`RequestTable`].
#[derive(Clone, Debug)]
pub struct ResponseConsensus {
    config: OracleConfig,
}

impl ResponseConsensus {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    /// Open a request for `key`, or return the existing one untouched.
    ///
    /// Returns the request's open index and, for a newly opened request, the
    /// `OracleRequest` event addressed to oracles holding that index. Fails
    /// only on an index space outside `3..=256`.
    pub fn request_flight_status(
        &self,
        table: &mut RequestTable,
        requester: Address,
        key: FlightKey,
    ) -> Result<(u8, Vec<Event>)> {
        if let Some(existing) = table.requests.get(&key) {
            debug!(flight = %key, index = existing.open_index, "request already exists");
            return Ok((existing.open_index, Vec::new()));
        }

        let open_index = pick_index(
            &[
                requester.as_bytes(),
                key.airline.as_bytes(),
                key.flight.as_bytes(),
                &key.timestamp.to_be_bytes(),
                &table.nonce.to_be_bytes(),
            ],
            self.config.index_space,
        )?;
        table.nonce += 1;

        info!(flight = %key, index = open_index, "flight status requested");
        let event = Event::OracleRequest {
            index: open_index,
            airline: key.airline,
            flight: key.flight.clone(),
            timestamp: key.timestamp,
        };
        table
            .requests
            .insert(key.clone(), FlightStatusRequest::new(key, open_index, requester));

        Ok((open_index, vec![event]))
    }

    /// Tally one oracle report.
    pub fn submit_response(
        &self,
        table: &mut RequestTable,
        oracles: &OracleRegistry,
        oracle: Address,
        key: FlightKey,
        index: u8,
        status_code: u8,
    ) -> Result<Vec<Event>> {
        let status = FlightStatus::try_from(status_code)?;

        let request = table
            .requests
            .get_mut(&key)
            .ok_or_else(|| Error::UnknownRequest(key.to_string()))?;

        if index != request.open_index {
            return Err(Error::IndexMismatch {
                expected: request.open_index,
                got: index,
            });
        }
        if !oracles.get(&oracle)?.has_index(index) {
            return Err(Error::IndexNotAssigned(index));
        }
        if let Some(final_status) = request.final_status {
            warn!(
                flight = %key,
                oracle = %oracle,
                reported = %status,
                %final_status,
                "late response for closed request"
            );
            return Err(Error::RequestClosed {
                key: key.to_string(),
                final_status: final_status.code(),
            });
        }
        if request.has_reported(&oracle) {
            return Err(Error::DuplicateVote {
                voter: oracle,
                candidate: key.to_string(),
            });
        }

        let reporters = request.responses.entry(status).or_default();
        reporters.insert(oracle);
        let count = reporters.len();
        let reached = reporters.reaches(self.config.min_responses);
        debug!(flight = %key, oracle = %oracle, %status, count, "oracle report tallied");

        let mut events = vec![Event::OracleReport {
            oracle,
            airline: key.airline,
            flight: key.flight.clone(),
            timestamp: key.timestamp,
            status,
        }];

        if reached {
            request.final_status = Some(status);
            request.is_open = false;
            info!(flight = %key, %status, "flight status finalized");
            events.push(Event::FlightStatusInfo {
                airline: key.airline,
                flight: key.flight,
                timestamp: key.timestamp,
                status,
            });
        }

        Ok(events)
    }
}

impl Default for ResponseConsensus {
    fn default() -> Self {
        Self::new(OracleConfig::default())
    }
}
