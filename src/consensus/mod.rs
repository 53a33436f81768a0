//! Consensus Module
//!
//! Provides the two quorum-gated processes of the registry:
//! - Airline admission by member vote
//! - Flight status determination from oracle reports

pub mod quorum;
pub mod registration;
pub mod responses;

pub use quorum::{required_votes, VoteSet};
pub use registration::RegistrationConsensus;
pub use responses::{RequestTable, ResponseConsensus};
