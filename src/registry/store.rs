//! The injected registry store.
//!
//! All authoritative state lives here and is handed explicitly to each
//! consensus operation. The store performs no locking: the host must apply
//! operations one at a time, each against the state the previous one left.

use crate::consensus::responses::RequestTable;
use crate::core::{Address, Result};
use crate::oracle::OracleRegistry;
use crate::registry::airline::AirlineRegistry;
use serde::{Deserialize, Serialize};

/// Airline registry, oracle pool and flight status request table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuretyStore {
    pub airlines: AirlineRegistry,
    pub oracles: OracleRegistry,
    pub requests: RequestTable,
}

impl SuretyStore {
    /// Fresh store with `genesis` as the only accepted airline.
    pub fn genesis(genesis: Address, prefunded: bool) -> Self {
        Self {
            airlines: AirlineRegistry::with_genesis(genesis, prefunded),
            oracles: OracleRegistry::new(),
            requests: RequestTable::new(),
        }
    }

    /// Encode the full state for an external persistence layer.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Rebuild a store from [`SuretyStore::snapshot`] output.
    pub fn restore(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, ETHER};

    #[test]
    fn test_snapshot_restore() {
        let genesis = Address::new([1; 20]);
        let oracle = Address::new([2; 20]);
        let mut store = SuretyStore::genesis(genesis, true);
        let indexes = store.oracles.register(oracle, ETHER, ETHER, 10).unwrap();

        let restored = SuretyStore::restore(&store.snapshot().unwrap()).unwrap();
        assert_eq!(restored.airlines.accepted_count(), 1);
        assert_eq!(restored.oracles.indexes(&oracle).unwrap(), indexes);
    }

    #[test]
    fn test_restore_garbage() {
        let result = SuretyStore::restore(&[0xff, 0x01]);
        assert!(matches!(result, Err(Error::SerializationError(_))));
    }
}
