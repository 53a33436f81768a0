//! Oracle pool and index assignment.
//!
//! Each oracle is assigned three distinct indexes from a shared index space
//! when it registers. Indexes are not unique across oracles: many oracles
//! share each index, which is what lets a request fan out to a bounded,
//! implicitly selected subset of the pool.

use crate::core::{Address, Amount, Error, Result};
use crate::identity::sha3_256_multi;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// A registered oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRecord {
    pub address: Address,
    /// Three distinct indexes, fixed at registration
    pub indexes: [u8; 3],
    /// Fee paid on registration
    pub fee_paid: Amount,
}

impl OracleRecord {
    /// Whether `index` is one of this oracle's assigned indexes.
    pub fn has_index(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}

/// Smallest index space that still fits three distinct indexes.
pub const MIN_INDEX_SPACE: u16 = 3;
/// Indexes are carried as `u8`.
pub const MAX_INDEX_SPACE: u16 = 256;

/// Reject an index space outside `MIN_INDEX_SPACE..=MAX_INDEX_SPACE`.
pub fn check_index_space(index_space: u16) -> Result<()> {
    if (MIN_INDEX_SPACE..=MAX_INDEX_SPACE).contains(&index_space) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "index_space must be within {}..={}, got {}",
            MIN_INDEX_SPACE, MAX_INDEX_SPACE, index_space
        )))
    }
}

/// Derive three distinct indexes in `0..index_space`.
///
/// Pure function of the oracle address, the value it submitted and a
/// monotonic nonce, so assignments are reproducible.
pub fn derive_indexes(
    address: &Address,
    value: Amount,
    nonce: u64,
    index_space: u16,
) -> Result<[u8; 3]> {
    check_index_space(index_space)?;
    let mut indexes: Vec<u8> = Vec::with_capacity(3);
    let mut round: u32 = 0;

    while indexes.len() < 3 {
        let hash = sha3_256_multi(&[
            address.as_bytes(),
            &value.to_be_bytes(),
            &nonce.to_be_bytes(),
            &round.to_be_bytes(),
        ]);
        for byte in hash.as_bytes() {
            let index = (u16::from(*byte) % index_space) as u8;
            if !indexes.contains(&index) {
                indexes.push(index);
                if indexes.len() == 3 {
                    break;
                }
            }
        }
        round += 1;
    }

    Ok([indexes[0], indexes[1], indexes[2]])
}

/// Pick a single index in `0..index_space` from arbitrary seed material.
pub fn pick_index(seed: &[&[u8]], index_space: u16) -> Result<u8> {
    check_index_space(index_space)?;
    let hash = sha3_256_multi(seed);
    let mut word = [0u8; 8];
    word.copy_from_slice(&hash.as_bytes()[..8]);
    Ok((u64::from_be_bytes(word) % u64::from(index_space)) as u8)
}

/// The pool of registered oracles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OracleRegistry {
    oracles: HashMap<Address, OracleRecord>,
    nonce: u64,
}

impl OracleRegistry {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `oracle`, paying `fee`, and assign its indexes.
    pub fn register(
        &mut self,
        oracle: Address,
        fee: Amount,
        required_fee: Amount,
        index_space: u16,
    ) -> Result<[u8; 3]> {
        if fee < required_fee {
            return Err(Error::InsufficientFunds {
                required: required_fee,
                provided: fee,
            });
        }
        if self.oracles.contains_key(&oracle) {
            return Err(Error::AlreadyRegistered(oracle));
        }

        let indexes = derive_indexes(&oracle, fee, self.nonce, index_space)?;
        self.nonce += 1;
        self.oracles.insert(
            oracle,
            OracleRecord {
                address: oracle,
                indexes,
                fee_paid: fee,
            },
        );

        info!(oracle = %oracle, ?indexes, "oracle registered");
        Ok(indexes)
    }

    /// Look up an oracle.
    pub fn get(&self, oracle: &Address) -> Result<&OracleRecord> {
        self.oracles
            .get(oracle)
            .ok_or(Error::NotRegistered(*oracle))
    }

    /// Assigned indexes of an oracle.
    pub fn indexes(&self, oracle: &Address) -> Result<[u8; 3]> {
        self.get(oracle).map(|record| record.indexes)
    }

    /// Number of registered oracles.
    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}
