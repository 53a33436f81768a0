//! Identity layer
//!
//! Provides principals for the registry:
//! - Ed25519 keypairs with derived addresses
//! - SHA3-256 hashing used for deterministic derivations

pub mod crypto;
pub mod keypair;

pub use crypto::{sha3_256, sha3_256_multi};
pub use keypair::{address_of, Keypair};
