//! # Surety - flight-delay insurance registry core
//!
//! Consensus-gated state for a consortium of airlines:
//! - **Registration**: airline admission, direct while the consortium is
//!   small and by member vote afterwards
//! - **Funding Gate**: stake required before an airline may act
//! - **Oracles**: index assignment and quorum over flight status reports
//! - **Events**: returned by every operation and kept in a hash-chained journal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surety::config::SuretyConfig;
//! use surety::identity::Keypair;
//! use surety::FlightSurety;
//!
//! let admin = Keypair::generate().address();
//! let genesis = Keypair::generate().address();
//! let mut registry = FlightSurety::new(admin, genesis, SuretyConfig::default()).unwrap();
//!
//! let candidate = Keypair::generate().address();
//! registry.register_airline(candidate, genesis).unwrap();
//! assert_eq!(registry.get_airline_count(), 2);
//! ```

pub mod config;
pub mod consensus;
pub mod core;
pub mod events;
pub mod host;
pub mod identity;
pub mod logging;
pub mod oracle;
pub mod registry;
pub mod surety;
pub mod switch;

pub use core::error::{Error, Result};
pub use host::SuretyHost;
pub use surety::{FlightSurety, Receipt};
