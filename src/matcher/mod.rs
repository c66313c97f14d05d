//! Pattern matching for destination addresses.
//!
//! Patterns constrain a hex prefix, a hex suffix, or both. Matching works
//! on raw address nibbles and never formats the address as text.

mod pattern;

pub use pattern::{Pattern, PatternError};
