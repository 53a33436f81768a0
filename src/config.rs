//! Registry configuration.
//!
//! Every constant the consensus engines depend on is configurable; the
//! defaults match the deployed network.

use crate::core::{Amount, Error, Result, ETHER};
use crate::oracle::check_index_space;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the Funding Gate does with value beyond one funding event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcessFundsPolicy {
    /// Keep everything as stake.
    Retain,
    /// Keep only what is needed to reach the minimum, report the rest as refunded.
    Refund,
}

impl Default for ExcessFundsPolicy {
    fn default() -> Self {
        Self::Retain
    }
}

/// Funding Gate configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingConfig {
    /// Minimum stake an airline must post before acting
    pub min_funding: Amount,
    /// Excess handling
    pub excess_policy: ExcessFundsPolicy,
    /// Whether the genesis airline starts out funded
    pub genesis_prefunded: bool,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            min_funding: 10 * ETHER,
            excess_policy: ExcessFundsPolicy::Retain,
            genesis_prefunded: true,
        }
    }
}

/// Registration Consensus configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Accepted-airline count from which admission requires a vote
    pub bootstrap_threshold: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            bootstrap_threshold: 4,
        }
    }
}

/// Oracle Assignment and Response Consensus configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Fee an oracle pays to register
    pub registration_fee: Amount,
    /// Size of the shared index space, indexes are drawn from `0..index_space`.
    /// Set to 3 for the three-index model, where every oracle holds every
    /// index and the open index is one of {0, 1, 2}.
    pub index_space: u16,
    /// Matching responses needed to finalize a flight status
    pub min_responses: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            registration_fee: ETHER,
            index_space: 10,
            min_responses: 3,
        }
    }
}

/// Top-level registry configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuretyConfig {
    pub funding: FundingConfig,
    pub registration: RegistrationConfig,
    pub oracle: OracleConfig,
}

impl SuretyConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the engines rely on.
    pub fn validate(&self) -> Result<()> {
        check_index_space(self.oracle.index_space)?;
        if self.oracle.min_responses == 0 {
            return Err(Error::InvalidConfig("min_responses must be at least 1".into()));
        }
        if self.registration.bootstrap_threshold == 0 {
            return Err(Error::InvalidConfig(
                "bootstrap_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
