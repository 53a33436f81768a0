//! Airline registration consensus.
//!
//! While the consortium is smaller than the bootstrap threshold, any accepted
//! and funded member admits a candidate on its own. From the threshold on, a
//! candidate needs votes from `ceil(accepted / 2)` distinct members, with the
//! threshold evaluated against the accepted count at the time of each vote.

use crate::config::RegistrationConfig;
use crate::consensus::quorum::required_votes;
use crate::core::{Address, Error, Result};
use crate::events::Event;
use crate::registry::AirlineRegistry;
use tracing::{debug, info, warn};

/// Registration state machine over an [`AirlineRegistry`].
#[derive(Clone, Debug)]
pub struct RegistrationConsensus {
    config: RegistrationConfig,
}

impl RegistrationConsensus {
    pub fn new(config: RegistrationConfig) -> Self {
        Self { config }
    }

    /// Sponsor or vote for `candidate` on behalf of `caller`.
    ///
    /// Returns the events the call produced: nothing when the candidate is
    /// already a member, `Registered` for direct admission, `Voted` for a vote
    /// and `Voted` followed by `Registered` for the vote that reaches quorum.
    pub fn register_airline(
        &self,
        airlines: &mut AirlineRegistry,
        candidate: Address,
        caller: Address,
    ) -> Result<Vec<Event>> {
        if !airlines.is_active_member(&caller) {
            warn!(caller = %caller, candidate = %candidate, "registration by non-member rejected");
            return Err(Error::Unauthorized(format!(
                "{} is not an accepted, funded airline",
                caller
            )));
        }

        if let Some(record) = airlines.record(&candidate) {
            if record.is_accepted() {
                debug!(candidate = %candidate, "candidate already accepted");
                return Ok(Vec::new());
            }
            if record.votes_received.contains(&caller) {
                return Err(Error::DuplicateVote {
                    voter: caller,
                    candidate: candidate.to_string(),
                });
            }
        }

        let accepted = airlines.accepted_count();
        if accepted < self.config.bootstrap_threshold {
            airlines.insert_applied(candidate);
            return Ok(admit(airlines, candidate).into_iter().collect());
        }

        let required = required_votes(accepted);
        let record = airlines.insert_applied(candidate);
        record.votes_received.insert(caller);
        let votes = record.votes_received.len();
        let reached = record.votes_received.reaches(required);
        debug!(candidate = %candidate, voter = %caller, votes, required, "admission vote cast");

        let mut events = vec![Event::Voted {
            candidate,
            voter: caller,
            votes,
            required,
        }];
        if reached {
            events.extend(admit(airlines, candidate));
        }
        Ok(events)
    }

    /// Self-application: create an Applied record for `caller` with no votes.
    pub fn apply_for_membership(
        &self,
        airlines: &mut AirlineRegistry,
        caller: Address,
    ) -> Result<u64> {
        if airlines.contains(&caller) {
            return Err(Error::AlreadyApplied(caller));
        }
        let sequence_number = airlines.insert_applied(caller).sequence_number;
        info!(airline = %caller, sequence_number, "membership application received");
        Ok(sequence_number)
    }

    /// Votes currently held by a pending candidate.
    pub fn pending_votes(&self, airlines: &AirlineRegistry, candidate: &Address) -> usize {
        airlines
            .record(candidate)
            .filter(|record| !record.is_accepted())
            .map(|record| record.votes_received.len())
            .unwrap_or(0)
    }
}

impl Default for RegistrationConsensus {
    fn default() -> Self {
        Self::new(RegistrationConfig::default())
    }
}

fn admit(airlines: &mut AirlineRegistry, candidate: Address) -> Option<Event> {
    let sequence_number = airlines.accept(&candidate)?;
    info!(
        airline = %candidate,
        sequence_number,
        members = airlines.accepted_count(),
        "airline registered"
    );
    Some(Event::Registered {
        airline: candidate,
        sequence_number,
    })
}
