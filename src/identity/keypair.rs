//! Account key material.
//!
//! The wallet layer proper lives outside this crate. A [`Keypair`] is the
//! minimum needed to mint principals for hosts and tests: an Ed25519 key whose
//! address is the trailing 20 bytes of the SHA3-256 of its public key.

use crate::core::Address;
use crate::identity::crypto::sha3_256;
use ed25519_dalek::{SigningKey, VerifyingKey};

/// An Ed25519 account key with its derived [`Address`].
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Create a keypair from fresh OS randomness.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut csprng = rand::rngs::OsRng;
        let mut secret_key_bytes = [0u8; 32];
        csprng.fill_bytes(&mut secret_key_bytes);
        Self::from_bytes(&secret_key_bytes)
    }

    /// Create from existing signing key bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Get the verifying (public) key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        address_of(&self.verifying_key().to_bytes())
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let address = self.address();
        f.debug_struct("Keypair")
            .field("address", &address.to_hex())
            .finish()
    }
}

/// Derive an address from raw public key bytes.
pub fn address_of(public_key: &[u8; 32]) -> Address {
    let hash = sha3_256(public_key);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::new(bytes)
}
