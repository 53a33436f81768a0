//! Airline records and the durable airline registry.

use crate::consensus::quorum::VoteSet;
use crate::core::{Address, Amount, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle state of an airline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirlineStatus {
    /// Known to the registry, awaiting admission
    Applied,
    /// Full consortium member
    Accepted,
}

/// An airline record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub address: Address,
    /// Order of first application, 1-based, never reused
    pub sequence_number: u64,
    pub status: AirlineStatus,
    pub funded: bool,
    /// Total stake retained by the Funding Gate
    pub stake: Amount,
    /// Admission votes; cleared on acceptance
    pub votes_received: VoteSet,
}

impl Airline {
    pub fn is_accepted(&self) -> bool {
        self.status == AirlineStatus::Accepted
    }

    /// Accepted and funded: allowed to take privileged actions.
    pub fn is_active_member(&self) -> bool {
        self.is_accepted() && self.funded
    }
}

/// Public view of an accepted airline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub address: Address,
    pub sequence_number: u64,
    pub accepted: bool,
}

/// The set of airline records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: HashMap<Address, Airline>,
    next_sequence: u64,
    accepted_count: usize,
}

impl AirlineRegistry {
    /// Create a registry whose first member is `genesis`.
    pub fn with_genesis(genesis: Address, prefunded: bool) -> Self {
        let mut registry = Self {
            airlines: HashMap::new(),
            next_sequence: 1,
            accepted_count: 0,
        };
        registry.insert_applied(genesis).funded = prefunded;
        registry.accept(&genesis);
        registry
    }

    /// Look up any record, pending or accepted.
    pub fn record(&self, address: &Address) -> Option<&Airline> {
        self.airlines.get(address)
    }

    pub(crate) fn record_mut(&mut self, address: &Address) -> Option<&mut Airline> {
        self.airlines.get_mut(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.airlines.contains_key(address)
    }

    /// Accepted airlines only; pending applicants are `NotFound`.
    pub fn get(&self, address: &Address) -> Result<AirlineInfo> {
        match self.airlines.get(address) {
            Some(airline) if airline.is_accepted() => Ok(AirlineInfo {
                address: airline.address,
                sequence_number: airline.sequence_number,
                accepted: true,
            }),
            _ => Err(Error::NotFound(*address)),
        }
    }

    pub fn is_accepted(&self, address: &Address) -> bool {
        self.airlines
            .get(address)
            .map(Airline::is_accepted)
            .unwrap_or(false)
    }

    pub fn is_active_member(&self, address: &Address) -> bool {
        self.airlines
            .get(address)
            .map(Airline::is_active_member)
            .unwrap_or(false)
    }

    /// Number of accepted airlines.
    pub fn accepted_count(&self) -> usize {
        self.accepted_count
    }

    /// Number of records, pending included.
    pub fn len(&self) -> usize {
        self.airlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airlines.is_empty()
    }

    /// Accepted airlines in admission order.
    pub fn members(&self) -> Vec<AirlineInfo> {
        let mut members: Vec<AirlineInfo> = self
            .airlines
            .values()
            .filter(|airline| airline.is_accepted())
            .map(|airline| AirlineInfo {
                address: airline.address,
                sequence_number: airline.sequence_number,
                accepted: true,
            })
            .collect();
        members.sort_by_key(|info| info.sequence_number);
        members
    }

    /// Create an Applied record if none exists. Returns the record either way.
    pub(crate) fn insert_applied(&mut self, address: Address) -> &mut Airline {
        let next_sequence = &mut self.next_sequence;
        self.airlines.entry(address).or_insert_with(|| {
            let sequence_number = *next_sequence;
            *next_sequence += 1;
            Airline {
                address,
                sequence_number,
                status: AirlineStatus::Applied,
                funded: false,
                stake: 0,
                votes_received: VoteSet::new(),
            }
        })
    }

    /// Promote a record to Accepted, clearing its votes. No-op if unknown or
    /// already accepted.
    pub(crate) fn accept(&mut self, address: &Address) -> Option<u64> {
        let airline = self.airlines.get_mut(address)?;
        if airline.is_accepted() {
            return None;
        }
        airline.status = AirlineStatus::Accepted;
        airline.votes_received.clear();
        self.accepted_count += 1;
        Some(airline.sequence_number)
    }
}
