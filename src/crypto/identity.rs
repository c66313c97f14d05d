//! Reticulum identity: the two keypairs plus their derived hashes.

use super::{Address, AddressDeriver, ExchangeKeypair, Fingerprint, SigningKeypair};

/// Size of the persisted private key blob (X25519 private || Ed25519 seed).
pub const PRIVATE_BLOB_LEN: usize = 64;

/// A complete identity with its fingerprint and destination address.
///
/// Fields are set once at construction; the fingerprint and address are
/// always derived from the stored keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    exchange_private: [u8; 32],
    exchange_public: [u8; 32],
    signing_seed: [u8; 32],
    signing_public: [u8; 32],
    fingerprint: Fingerprint,
    address: Address,
}

impl Identity {
    /// Builds an identity from freshly generated keypairs.
    #[inline]
    pub fn from_keys(exchange: &ExchangeKeypair, signing: &SigningKeypair, deriver: &AddressDeriver) -> Self {
        let (fingerprint, address) = deriver.derive(exchange.public_key(), signing.public_key());

        Self {
            exchange_private: *exchange.private_key(),
            exchange_public: *exchange.public_key(),
            signing_seed: *signing.seed(),
            signing_public: *signing.public_key(),
            fingerprint,
            address,
        }
    }

    /// Rebuilds an identity from a persisted 64-byte private blob.
    ///
    /// The X25519 key is kept exactly as stored, so `private_bytes()`
    /// returns `blob` unchanged. Clamping only affects the public key
    /// computation, which X25519 performs on any scalar.
    pub fn from_private_bytes(blob: &[u8; PRIVATE_BLOB_LEN], deriver: &AddressDeriver) -> Self {
        let mut private_key = [0u8; 32];
        let mut seed = [0u8; 32];
        private_key.copy_from_slice(&blob[..32]);
        seed.copy_from_slice(&blob[32..]);

        let exchange = ExchangeKeypair::from_private(private_key);
        let signing = SigningKeypair::from_seed(seed);
        let (fingerprint, address) = deriver.derive(exchange.public_key(), signing.public_key());

        Self {
            exchange_private: private_key,
            exchange_public: *exchange.public_key(),
            signing_seed: seed,
            signing_public: *signing.public_key(),
            fingerprint,
            address,
        }
    }

    /// Returns the persisted private key layout.
    pub fn private_bytes(&self) -> [u8; PRIVATE_BLOB_LEN] {
        let mut blob = [0u8; PRIVATE_BLOB_LEN];
        blob[..32].copy_from_slice(&self.exchange_private);
        blob[32..].copy_from_slice(&self.signing_seed);
        blob
    }

    /// Returns the combined public key (X25519 || Ed25519).
    pub fn public_bytes(&self) -> [u8; 64] {
        let mut blob = [0u8; 64];
        blob[..32].copy_from_slice(&self.exchange_public);
        blob[32..].copy_from_slice(&self.signing_public);
        blob
    }

    pub fn exchange_private(&self) -> &[u8; 32] {
        &self.exchange_private
    }

    pub fn exchange_public(&self) -> &[u8; 32] {
        &self.exchange_public
    }

    pub fn signing_seed(&self) -> &[u8; 32] {
        &self.signing_seed
    }

    pub fn signing_public(&self) -> &[u8; 32] {
        &self.signing_public
    }

    #[inline]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}
