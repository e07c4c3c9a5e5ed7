// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine configuration.
//!
//! Configuration is plain JSON. Every field is optional; missing fields take
//! the defaults below.

use leave_ledger_domain::{AccrualPolicy, DEFAULT_ACCRUAL_PERIOD_DAYS};
use leave_ledger_persistence::DEFAULT_BUSY_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for `EngineConfig`.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Tunables for a `LeaveEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Refuse reservations that overdraw the balance or exceed the annual cap.
    pub strict_balance: bool,
    /// Minimum number of days between two accruals on the same balance.
    pub accrual_period_days: u32,
    /// How many times a transient store failure is retried.
    pub max_retries: u32,
    /// Backoff before the first retry; doubled on each further retry.
    pub retry_backoff_ms: u64,
    /// How long a `SQLite` writer waits for the database lock.
    pub busy_timeout_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_balance: false,
            accrual_period_days: DEFAULT_ACCRUAL_PERIOD_DAYS,
            max_retries: 3,
            retry_backoff_ms: 25,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or a value is out of range.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero accrual period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accrual_period_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "accrual_period_days",
                message: String::from("must be at least 1"),
            });
        }
        Ok(())
    }

    /// The accrual policy these settings describe.
    #[must_use]
    pub const fn accrual_policy(&self) -> AccrualPolicy {
        AccrualPolicy {
            period_days: self.accrual_period_days,
        }
    }

    /// Backoff before retry number `attempt` (0-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor: u64 = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.strict_balance);
        assert_eq!(config.accrual_period_days, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_backoff_ms, 25);
        assert_eq!(config.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "strict_balance": true }"#).unwrap();
        assert!(config.strict_balance);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_zero_accrual_period_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "accrual_period_days": 0 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "accrual_period_days",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str("{ strict"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = EngineConfig::from_file("/nonexistent/leave-ledger.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_backoff_doubles() {
        let config = EngineConfig::default();
        assert_eq!(config.backoff_for(0), Duration::from_millis(25));
        assert_eq!(config.backoff_for(2), Duration::from_millis(100));
    }
}
