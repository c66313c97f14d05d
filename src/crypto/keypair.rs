//! X25519 / Ed25519 keypair generation.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};

/// Bytes drawn from the entropy source per generated identity.
pub const KEY_MATERIAL_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeygenError {
    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// A source of secret key material.
///
/// Implementations must either fill the whole buffer with
/// cryptographically secure bytes or fail.
pub trait EntropySource {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), KeygenError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    #[inline]
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), KeygenError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| KeygenError::RandomnessUnavailable(e.to_string()))
    }
}

/// Clamps a raw scalar for X25519.
#[inline]
pub fn clamp_scalar(scalar: &mut [u8; 32]) {
    scalar[0] &= 0b1111_1000;
    scalar[31] &= 0b0111_1111;
    scalar[31] |= 0b0100_0000;
}

/// Key-exchange (X25519) keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeKeypair {
    private_key: [u8; 32],
    public_key: [u8; 32],
}

impl ExchangeKeypair {
    /// Builds a keypair from raw private bytes, clamping them first.
    pub fn from_private(mut private_key: [u8; 32]) -> Self {
        clamp_scalar(&mut private_key);
        let public_key = x25519(private_key, X25519_BASEPOINT_BYTES);

        Self {
            private_key,
            public_key,
        }
    }

    /// Returns the clamped private scalar.
    pub fn private_key(&self) -> &[u8; 32] {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }
}

/// Signing (Ed25519) keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKeypair {
    seed: [u8; 32],
    public_key: [u8; 32],
}

impl SigningKeypair {
    /// Builds a keypair from a 32-byte seed using the standard Ed25519
    /// key derivation.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let public_key = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        Self { seed, public_key }
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }
}

/// Produces fresh exchange and signing keypairs from an entropy source.
#[derive(Debug)]
pub struct KeyPairGenerator<E = OsEntropy> {
    entropy: E,
    buffer: [u8; KEY_MATERIAL_LEN],
}

impl KeyPairGenerator<OsEntropy> {
    /// Creates a generator backed by the OS CSPRNG.
    pub fn new() -> Self {
        Self::with_entropy(OsEntropy)
    }
}

impl Default for KeyPairGenerator<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntropySource> KeyPairGenerator<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self {
            entropy,
            buffer: [0u8; KEY_MATERIAL_LEN],
        }
    }

    /// Generates a new random keypair set.
    ///
    /// Draws exactly 64 bytes: the first 32 become the X25519 private
    /// scalar, the last 32 the Ed25519 seed. Every draw yields a valid pair.
    #[inline]
    pub fn generate(&mut self) -> Result<(ExchangeKeypair, SigningKeypair), KeygenError> {
        self.entropy.fill(&mut self.buffer)?;

        let mut private_key = [0u8; 32];
        let mut seed = [0u8; 32];
        private_key.copy_from_slice(&self.buffer[..32]);
        seed.copy_from_slice(&self.buffer[32..]);

        Ok((
            ExchangeKeypair::from_private(private_key),
            SigningKeypair::from_seed(seed),
        ))
    }
}
