//! Funding Gate.
//!
//! Tracks whether an airline has posted the stake required before it may
//! take privileged actions such as sponsoring or voting for new members.

use crate::config::{ExcessFundsPolicy, FundingConfig};
use crate::core::{Address, Amount, Error, Result};
use crate::registry::airline::AirlineRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of a funding call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingReceipt {
    /// Amount added to the airline's stake
    pub retained: Amount,
    /// Amount to be handed back by the settlement layer
    pub refunded: Amount,
}

/// Stake verification for airlines.
#[derive(Clone, Debug)]
pub struct FundingGate {
    config: FundingConfig,
}

impl FundingGate {
    pub fn new(config: FundingConfig) -> Self {
        Self { config }
    }

    /// Minimum stake for one funding event.
    pub fn min_funding(&self) -> Amount {
        self.config.min_funding
    }

    /// Post `amount` as stake for `airline`.
    pub fn post_funding(
        &self,
        airlines: &mut AirlineRegistry,
        airline: Address,
        amount: Amount,
    ) -> Result<FundingReceipt> {
        let min_funding = self.config.min_funding;
        let record = airlines
            .record_mut(&airline)
            .ok_or(Error::UnknownAirline(airline))?;

        if amount < min_funding {
            return Err(Error::InsufficientFunds {
                required: min_funding,
                provided: amount,
            });
        }

        let receipt = match self.config.excess_policy {
            ExcessFundsPolicy::Retain => FundingReceipt {
                retained: amount,
                refunded: 0,
            },
            ExcessFundsPolicy::Refund if record.funded => FundingReceipt {
                retained: 0,
                refunded: amount,
            },
            ExcessFundsPolicy::Refund => FundingReceipt {
                retained: min_funding,
                refunded: amount - min_funding,
            },
        };

        if record.funded {
            debug!(airline = %airline, amount = %amount, "additional funding posted");
        } else {
            info!(airline = %airline, amount = %amount, "airline funded");
        }

        record.funded = true;
        record.stake = record.stake.saturating_add(receipt.retained);
        Ok(receipt)
    }

    /// Whether `airline` has posted its stake. Unknown airlines are unfunded.
    pub fn is_funded(&self, airlines: &AirlineRegistry, airline: &Address) -> bool {
        airlines
            .record(airline)
            .map(|record| record.funded)
            .unwrap_or(false)
    }
}

impl Default for FundingGate {
    fn default() -> Self {
        Self::new(FundingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ETHER;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn registry() -> AirlineRegistry {
        let mut airlines = AirlineRegistry::with_genesis(addr(0), true);
        airlines.insert_applied(addr(1));
        airlines
    }

    #[test]
    fn test_post_funding() {
        let gate = FundingGate::default();
        let mut airlines = registry();
        assert!(!gate.is_funded(&airlines, &addr(1)));

        let receipt = gate.post_funding(&mut airlines, addr(1), 10 * ETHER).unwrap();
        assert_eq!(receipt.retained, 10 * ETHER);
        assert!(gate.is_funded(&airlines, &addr(1)));
    }

    #[test]
    fn test_insufficient_funds() {
        let gate = FundingGate::default();
        let mut airlines = registry();
        let result = gate.post_funding(&mut airlines, addr(1), 9 * ETHER);
        assert_eq!(
            result,
            Err(Error::InsufficientFunds {
                required: 10 * ETHER,
                provided: 9 * ETHER,
            })
        );
        assert!(!gate.is_funded(&airlines, &addr(1)));
    }

    #[test]
    fn test_unknown_airline() {
        let gate = FundingGate::default();
        let mut airlines = registry();
        let result = gate.post_funding(&mut airlines, addr(7), 10 * ETHER);
        assert_eq!(result, Err(Error::UnknownAirline(addr(7))));
        assert!(!gate.is_funded(&airlines, &addr(7)));
    }

    #[test]
    fn test_retain_policy_accumulates() {
        let gate = FundingGate::default();
        let mut airlines = registry();
        gate.post_funding(&mut airlines, addr(1), 12 * ETHER).unwrap();
        gate.post_funding(&mut airlines, addr(1), 10 * ETHER).unwrap();
        assert_eq!(airlines.record(&addr(1)).unwrap().stake, 22 * ETHER);
    }

    #[test]
    fn test_refund_policy() {
        let gate = FundingGate::new(FundingConfig {
            excess_policy: ExcessFundsPolicy::Refund,
            ..Default::default()
        });
        let mut airlines = registry();

        let first = gate.post_funding(&mut airlines, addr(1), 15 * ETHER).unwrap();
        assert_eq!(first.retained, 10 * ETHER);
        assert_eq!(first.refunded, 5 * ETHER);

        let second = gate.post_funding(&mut airlines, addr(1), 10 * ETHER).unwrap();
        assert_eq!(second.retained, 0);
        assert_eq!(second.refunded, 10 * ETHER);
        assert_eq!(airlines.record(&addr(1)).unwrap().stake, 10 * ETHER);
    }
}
