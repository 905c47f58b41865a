//! Ledger Configuration
//!
//! Tunable thresholds and windows for the commit-reveal ledger and the
//! ticket manager. Loaded from JSON; any missing field keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EXPIRY_OFFSET, MIN_COMMIT_DEPOSIT, MIN_REQUEST_FEE, REVEAL_WINDOW};

/// Configuration shared by both subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    /// Minimum value attached to `commit`.
    pub min_commit_deposit: u128,
    /// Minimum value attached to `request_entropy`.
    pub min_request_fee: u128,
    /// Positions after the target during which a reveal is accepted.
    pub reveal_window: u64,
    /// Ticket expiry, relative to the request position.
    pub expiry_offset: u64,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            min_commit_deposit: MIN_COMMIT_DEPOSIT,
            min_request_fee: MIN_REQUEST_FEE,
            reveal_window: REVEAL_WINDOW,
            expiry_offset: EXPIRY_OFFSET,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config is not valid JSON for this schema.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Reveal window of zero would reject every reveal.
    #[error("reveal_window must be at least 1")]
    EmptyRevealWindow,
    /// Tickets resolve at request + 1 and must be readable before expiry.
    #[error("expiry_offset must be greater than 2, got {0}")]
    ExpiryTooShort(u64),
}

impl EntropyConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check window invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal_window == 0 {
            return Err(ConfigError::EmptyRevealWindow);
        }
        if self.expiry_offset <= 2 {
            return Err(ConfigError::ExpiryTooShort(self.expiry_offset));
        }
        Ok(())
    }
}
