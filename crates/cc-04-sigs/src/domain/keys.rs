//! # Ed25519 Keys
//!
//! Deterministic-nonce signatures over sign bytes; the public key is
//! the condition data for `sigs/ed25519`.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use shared_types::{Address, ChainError, ChainResult, Condition};
use zeroize::Zeroize;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Parse and check that the bytes are a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> ChainResult<Self> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            ChainError::input(format!("public key must be 32 bytes, got {}", bytes.len()))
        })?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| ChainError::input("invalid public key"))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> ChainResult<()> {
        let key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| ChainError::input("invalid public key"))?;
        let sig = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| ChainError::input("malformed signature"))?;
        key.verify(message, &sig)
            .map_err(|_| ChainError::unauthorized("invalid signature"))
    }

    pub fn condition(&self) -> Condition {
        Condition::new("sigs", "ed25519", self.0.to_vec())
    }

    pub fn address(&self) -> Address {
        self.condition().address()
    }
}

/// Ed25519 signing key.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public", &self.public_key())
            .finish_non_exhaustive()
    }
}
