//! Hashing utilities.
//!
//! Everything deterministic in the registry (index assignment, open index
//! selection, journal chaining) is derived from SHA3-256.

use crate::core::Hash256;
use sha3::{Digest, Sha3_256};

/// Compute SHA3-256 hash of data.
pub fn sha3_256(data: &[u8]) -> Hash256 {
    sha3_256_multi(&[data])
}

/// Compute SHA3-256 hash of multiple data chunks.
pub fn sha3_256_multi(chunks: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha3_256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    Hash256::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256() {
        let data = b"test data";
        let hash1 = sha3_256(data);
        let hash2 = sha3_256(data);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_sha3_256_different_data() {
        let hash1 = sha3_256(b"data1");
        let hash2 = sha3_256(b"data2");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_sha3_256_multi_matches_concatenation() {
        let chunks: &[&[u8]] = &[b"chunk1", b"chunk2"];
        assert_eq!(sha3_256_multi(chunks), sha3_256(b"chunk1chunk2"));
    }
}
