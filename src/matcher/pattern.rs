//! Pattern matching implementation.

use crate::crypto::{Address, ADDRESS_NIBBLES};

/// Errors raised while parsing a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("{side} must contain only hex characters [0-9a-fA-F], found {found:?}")]
    InvalidHex { side: &'static str, found: char },
    #[error("{side} must be 1-{max} hex characters, got {len}", max = ADDRESS_NIBBLES)]
    TooLong { side: &'static str, len: usize },
    #[error("at least one of prefix or suffix must be specified")]
    Empty,
}

/// A compiled prefix/suffix pattern stored as nibbles (0-15).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl Pattern {
    /// Parses prefix and suffix hex strings. Either may be empty, but not both.
    pub fn parse(prefix: &str, suffix: &str) -> Result<Self, PatternError> {
        let prefix = parse_nibbles("prefix", prefix)?;
        let suffix = parse_nibbles("suffix", suffix)?;

        if prefix.is_empty() && suffix.is_empty() {
            return Err(PatternError::Empty);
        }

        Ok(Self { prefix, suffix })
    }

    /// Returns the prefix nibbles.
    pub fn prefix_nibbles(&self) -> &[u8] {
        &self.prefix
    }

    /// Returns the suffix nibbles.
    pub fn suffix_nibbles(&self) -> &[u8] {
        &self.suffix
    }

    /// Returns the prefix as lowercase hex.
    pub fn prefix_hex(&self) -> String {
        nibbles_to_hex(&self.prefix)
    }

    /// Returns the suffix as lowercase hex.
    pub fn suffix_hex(&self) -> String {
        nibbles_to_hex(&self.suffix)
    }

    /// Total number of constrained nibbles.
    pub fn constrained_nibbles(&self) -> usize {
        self.prefix.len() + self.suffix.len()
    }

    /// Matches an address against this pattern, nibble by nibble.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        let bytes = address.as_bytes();

        let prefix_ok = self
            .prefix
            .iter()
            .enumerate()
            .all(|(i, &n)| nibble_at(bytes, i) == n);
        if !prefix_ok {
            return false;
        }

        let start = ADDRESS_NIBBLES - self.suffix.len();
        self.suffix
            .iter()
            .enumerate()
            .all(|(j, &n)| nibble_at(bytes, start + j) == n)
    }

    /// Returns the estimated difficulty (number of attempts to find a match).
    ///
    /// Each constrained nibble has 16 possible values, so the expected
    /// number of attempts is 16^k.
    pub fn estimated_difficulty(&self) -> u64 {
        16u64.saturating_pow(self.constrained_nibbles() as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let diff = self.estimated_difficulty();
        match diff {
            0..=1_000 => "Very Easy (< 1 second)".into(),
            1_001..=100_000 => "Easy (seconds)".into(),
            100_001..=10_000_000 => "Medium (minutes)".into(),
            10_000_001..=1_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.prefix.is_empty(), self.suffix.is_empty()) {
            (false, true) => write!(f, "{}...", self.prefix_hex()),
            (true, false) => write!(f, "...{}", self.suffix_hex()),
            _ => write!(f, "{}...{}", self.prefix_hex(), self.suffix_hex()),
        }
    }
}

/// Even index is the high nibble of byte `i / 2`, odd index the low nibble.
#[inline(always)]
fn nibble_at(bytes: &[u8], index: usize) -> u8 {
    let byte = bytes[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

fn parse_nibbles(side: &'static str, hex_str: &str) -> Result<Vec<u8>, PatternError> {
    if hex_str.len() > ADDRESS_NIBBLES {
        return Err(PatternError::TooLong {
            side,
            len: hex_str.len(),
        });
    }

    hex_str
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or(PatternError::InvalidHex { side, found: c })
        })
        .collect()
}

fn nibbles_to_hex(nibbles: &[u8]) -> String {
    nibbles
        .iter()
        .filter_map(|&n| char::from_digit(n as u32, 16))
        .collect()
}
