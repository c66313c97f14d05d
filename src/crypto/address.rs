//! Reticulum destination address derivation.

use std::fmt;

use sha2::{Digest, Sha256};

/// Destination name used by LXMF for message delivery.
pub const LXMF_DELIVERY: &str = "lxmf.delivery";

/// Length of the truncated destination name hash.
pub const NAME_HASH_LEN: usize = 10;

/// Length of truncated identity and destination hashes (128 bits).
pub const TRUNCATED_HASH_LEN: usize = 16;

/// Number of nibbles in an address.
pub const ADDRESS_NIBBLES: usize = TRUNCATED_HASH_LEN * 2;

/// A destination address (16 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; TRUNCATED_HASH_LEN]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; TRUNCATED_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; TRUNCATED_HASH_LEN] {
        &self.0
    }

    /// Returns the address as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Truncated hash of an identity's combined public keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; TRUNCATED_HASH_LEN]);

impl Fingerprint {
    #[inline]
    pub const fn from_bytes(bytes: [u8; TRUNCATED_HASH_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; TRUNCATED_HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Derives fingerprints and destination addresses from public keys.
///
/// The name hash is computed once at construction and reused for every
/// derivation. The hash chain is:
/// 1. `name_hash = SHA-256(name)[..10]`
/// 2. `fingerprint = SHA-256(exchange_public || signing_public)[..16]`
/// 3. `address = SHA-256(name_hash || fingerprint)[..16]`
#[derive(Debug, Clone)]
pub struct AddressDeriver {
    name: String,
    name_hash: [u8; NAME_HASH_LEN],
}

impl AddressDeriver {
    /// Creates a deriver for the given dotted destination name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let digest = Sha256::digest(name.as_bytes());
        let mut name_hash = [0u8; NAME_HASH_LEN];
        name_hash.copy_from_slice(&digest[..NAME_HASH_LEN]);

        Self { name, name_hash }
    }

    /// Creates a deriver for `lxmf.delivery` destinations.
    pub fn lxmf() -> Self {
        Self::new(LXMF_DELIVERY)
    }

    /// Returns the destination name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the truncated name hash.
    pub fn name_hash(&self) -> &[u8; NAME_HASH_LEN] {
        &self.name_hash
    }

    /// Hashes the exchange public key followed by the signing public key.
    #[inline]
    pub fn fingerprint(&self, exchange_public: &[u8; 32], signing_public: &[u8; 32]) -> Fingerprint {
        let mut material = [0u8; 64];
        material[..32].copy_from_slice(exchange_public);
        material[32..].copy_from_slice(signing_public);

        Fingerprint(truncated_sha256(&material))
    }

    /// Hashes the name hash followed by the fingerprint.
    #[inline]
    pub fn address(&self, fingerprint: &Fingerprint) -> Address {
        let mut material = [0u8; NAME_HASH_LEN + TRUNCATED_HASH_LEN];
        material[..NAME_HASH_LEN].copy_from_slice(&self.name_hash);
        material[NAME_HASH_LEN..].copy_from_slice(&fingerprint.0);

        Address(truncated_sha256(&material))
    }

    /// Runs the full chain from public keys to destination address.
    #[inline]
    pub fn derive(&self, exchange_public: &[u8; 32], signing_public: &[u8; 32]) -> (Fingerprint, Address) {
        let fingerprint = self.fingerprint(exchange_public, signing_public);
        let address = self.address(&fingerprint);
        (fingerprint, address)
    }
}

impl Default for AddressDeriver {
    fn default() -> Self {
        Self::lxmf()
    }
}

#[inline]
fn truncated_sha256(data: &[u8]) -> [u8; TRUNCATED_HASH_LEN] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; TRUNCATED_HASH_LEN];
    out.copy_from_slice(&digest[..TRUNCATED_HASH_LEN]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    // RFC 7748 Alice public key and RFC 8032 test 1 public key.
    const EXCHANGE_PUBLIC: &str = "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a";
    const SIGNING_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_name_hash() {
        let deriver = AddressDeriver::lxmf();
        assert_eq!(hex::encode(deriver.name_hash()), "6ec60bc318e2c0f0d908");
        assert_eq!(deriver.name(), "lxmf.delivery");
    }

    #[test]
    fn test_known_derivation() {
        let deriver = AddressDeriver::lxmf();
        let (fingerprint, address) = deriver.derive(&key(EXCHANGE_PUBLIC), &key(SIGNING_PUBLIC));

        assert_eq!(fingerprint.to_hex(), "48f7e3807dce41a286611331ddfbe99d");
        assert_eq!(address.to_hex(), "91eb19b62a69a9913d50e49f6376e7a0");
    }

    #[test]
    fn test_other_destination_name() {
        let deriver = AddressDeriver::new("nomadnetwork.node");
        let (_, address) = deriver.derive(&key(EXCHANGE_PUBLIC), &key(SIGNING_PUBLIC));
        assert_eq!(address.to_hex(), "2b946cce99b092f537340d447a8c6210");
    }

    #[test]
    fn test_deterministic() {
        let deriver = AddressDeriver::lxmf();
        let a = deriver.derive(&[7u8; 32], &[9u8; 32]);
        let b = deriver.derive(&[7u8; 32], &[9u8; 32]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_order_matters() {
        let deriver = AddressDeriver::lxmf();
        let (forward, _) = deriver.derive(&[1u8; 32], &[2u8; 32]);
        let (swapped, _) = deriver.derive(&[2u8; 32], &[1u8; 32]);
        assert_ne!(forward, swapped);
    }

    #[test]
    fn test_hex_output() {
        let addr = Address::from_bytes([0xab; 16]);
        assert_eq!(addr.to_string(), "abababababababababababababababab");
        assert_eq!(format!("{:?}", addr), "Address(abababababababababababababababab)");
    }
}
