//! Cryptographic operations for Reticulum identity and address generation.
//!
//! This module provides:
//! - Secure random X25519 / Ed25519 key generation
//! - Destination address derivation using truncated SHA-256
//! - Identity assembly and reconstruction from persisted bytes

mod address;
mod identity;
mod keypair;

pub use address::{
    Address, AddressDeriver, Fingerprint, ADDRESS_NIBBLES, LXMF_DELIVERY, NAME_HASH_LEN,
    TRUNCATED_HASH_LEN,
};
pub use identity::{Identity, PRIVATE_BLOB_LEN};
pub use keypair::{
    clamp_scalar, EntropySource, ExchangeKeypair, KeyPairGenerator, KeygenError, OsEntropy,
    SigningKeypair, KEY_MATERIAL_LEN,
};
