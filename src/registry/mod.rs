//! Airline registry
//!
//! - Airline records and lifecycle (Applied -> Accepted)
//! - Funding Gate for privileged actions
//! - The injected store shared by both consensus engines

pub mod airline;
pub mod funding;
pub mod store;

pub use airline::{Airline, AirlineInfo, AirlineRegistry, AirlineStatus};
pub use funding::{FundingGate, FundingReceipt};
pub use store::SuretyStore;
