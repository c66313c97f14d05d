//! Runtime configuration for the vanity address generator.

use std::path::PathBuf;

use clap::Parser;

use crate::matcher::{Pattern, PatternError};

/// LXMF Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Desired hex prefix (1-32 chars)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Desired hex suffix (1-32 chars)
    #[arg(short, long, visible_alias = "postfix")]
    pub suffix: Option<String>,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Output path for the identity file (a `.txt` report is written alongside)
    #[arg(short, long, default_value = "identity")]
    pub out: PathBuf,

    /// Search without saving the identity
    #[arg(long, default_value = "false")]
    pub dry_run: bool,

    /// Progress report interval in seconds (0 disables progress output)
    #[arg(short = 'r', long, default_value = "1")]
    pub report_interval: u64,

    /// Verify an existing identity file instead of searching
    #[arg(long, value_name = "PATH")]
    pub verify: Option<PathBuf>,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Parses the prefix and suffix into a pattern.
    pub fn pattern(&self) -> Result<Pattern, ConfigError> {
        let prefix = self.prefix.as_deref().unwrap_or("");
        let suffix = self.suffix.as_deref().unwrap_or("");
        Ok(Pattern::parse(prefix, suffix)?)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify.is_some() {
            return Ok(());
        }

        self.pattern()?;

        let workers = self.worker_count();
        if workers < 1 {
            return Err(ConfigError::InvalidWorkerCount(workers));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),
    #[error("workers must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(prefix: Option<&str>, suffix: Option<&str>) -> Config {
        Config {
            prefix: prefix.map(Into::into),
            suffix: suffix.map(Into::into),
            workers: None,
            out: PathBuf::from("identity"),
            dry_run: false,
            report_interval: 1,
            verify: None,
        }
    }

    #[test]
    fn test_valid_pattern() {
        let config = make_test_config(Some("dead"), None);
        assert!(config.validate().is_ok());
        assert_eq!(config.pattern().unwrap().prefix_hex(), "dead");
    }

    #[test]
    fn test_invalid_pattern() {
        let config = make_test_config(Some("xyz"), None);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern(PatternError::InvalidHex { .. }))
        ));
    }

    #[test]
    fn test_missing_pattern() {
        let config = make_test_config(None, Some(""));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern(PatternError::Empty))
        ));
    }

    #[test]
    fn test_zero_workers() {
        let mut config = make_test_config(None, Some("be"));
        config.workers = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn test_verify_skips_pattern() {
        let mut config = make_test_config(None, None);
        config.verify = Some(PathBuf::from("identity"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing() {
        let config = Config::try_parse_from([
            "lxmf-vanity",
            "--prefix",
            "CAFE",
            "--postfix",
            "01",
            "-w",
            "3",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(config.worker_count(), 3);
        assert!(config.dry_run);
        assert_eq!(config.out, PathBuf::from("identity"));

        let pattern = config.pattern().unwrap();
        assert_eq!(pattern.prefix_hex(), "cafe");
        assert_eq!(pattern.suffix_hex(), "01");
    }

    #[test]
    fn test_default_workers() {
        let config = make_test_config(Some("a"), None);
        assert_eq!(config.worker_count(), num_cpus::get());
    }
}
