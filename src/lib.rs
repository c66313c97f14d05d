//! # lxmf_vanity
//!
//! Vanity address generator for LXMF / Reticulum destinations.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation, identity assembly and address derivation
//! - `matcher`: Nibble-level prefix/suffix matching
//! - `worker`: Parallel search, result hand-off and progress sampling
//! - `output`: Identity file and report persistence
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod output;
pub mod worker;

pub use config::{Config, ConfigError};
pub use crypto::{Address, AddressDeriver, Fingerprint, Identity, KeyPairGenerator};
pub use matcher::{Pattern, PatternError};
pub use output::{load_identity, save_identity, PersistError};
pub use worker::{ProgressReporter, SearchError, VanityResult, WorkerPool};
