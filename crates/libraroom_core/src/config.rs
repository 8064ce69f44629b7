//! Shell configuration.
//!
//! # Responsibility
//! - Hold the store key namespace and connectivity probe cadence.
//! - Parse optional JSON overrides supplied by the host application.
//!
//! # Invariants
//! - `probe_interval_ms` is always > 0 on a validated config.
//! - Storage keys are derived from `key_prefix`, never configured one by one.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default namespace for persisted keys.
pub const DEFAULT_KEY_PREFIX: &str = "libraroom";
/// Default connectivity probe cadence.
pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 5_000;

/// Runtime configuration for `AppShell`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub key_prefix: String,
    pub probe_interval_ms: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            probe_interval_ms: DEFAULT_PROBE_INTERVAL_MS,
        }
    }
}

impl ShellConfig {
    /// Parses and validates a JSON config document. Missing fields take
    /// their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.key_prefix.trim();
        if prefix.is_empty() {
            return Err(ConfigError::BlankKeyPrefix);
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::InvalidKeyPrefix(prefix.to_string()));
        }
        if self.probe_interval_ms == 0 {
            return Err(ConfigError::ZeroProbeInterval);
        }
        Ok(())
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(self.key_prefix.trim())
    }
}

/// Persisted key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub started: String,
    pub user: String,
    pub last_tab: String,
}

impl StorageKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            started: format!("{prefix}_started"),
            user: format!("{prefix}_user"),
            last_tab: format!("{prefix}_last_tab"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    BlankKeyPrefix,
    InvalidKeyPrefix(String),
    ZeroProbeInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid shell config: {message}"),
            Self::BlankKeyPrefix => write!(f, "key_prefix cannot be blank"),
            Self::InvalidKeyPrefix(value) => write!(
                f,
                "key_prefix `{value}` must use only ascii letters, digits, `_` or `-`"
            ),
            Self::ZeroProbeInterval => write!(f, "probe_interval_ms must be greater than zero"),
        }
    }
}

impl Error for ConfigError {}
