//! # cfn configuration
//!
//! Optional YAML settings file for the `cfn` command-line tool.
//!
//! Every key is optional. Values given on the command line win over the file,
//! and the file wins over built-in defaults; this crate only covers the file
//! half and the conversion into the option structs `cfn-core` expects.
//!
//! ```yaml
//! region: eu-west-1
//! profile: ${AWS_PROFILE:-default}
//! ignore_case: true
//! log_level: info
//! tail:
//!   interval: 10
//! drift:
//!   poll_interval: 3
//!   timeout: 0
//! ```

#![warn(missing_docs)]

use cfn_core::DriftOptions;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub mod parser;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

const DEFAULT_TAIL_INTERVAL_SECS: u64 = 5;

/// Root of the settings file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Provider region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Named credentials profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Omit table header rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_headers: Option<bool>,

    /// Case-insensitive filtering by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,

    /// Baseline log level (error, warn, info, debug, trace)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Event tail settings
    #[serde(default, skip_serializing_if = "TailSettings::is_default")]
    pub tail: TailSettings,

    /// Drift detection settings
    #[serde(default, skip_serializing_if = "DriftSettings::is_default")]
    pub drift: DriftSettings,
}

/// `tail` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TailSettings {
    /// Poll interval in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
}

impl TailSettings {
    fn is_default(&self) -> bool {
        self == &TailSettings::default()
    }
}

/// `drift` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DriftSettings {
    /// Status poll interval in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<u64>,

    /// Give up after this many seconds; 0 waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl DriftSettings {
    fn is_default(&self) -> bool {
        self == &DriftSettings::default()
    }
}

impl Settings {
    /// Configured log level, if one is set and valid
    pub fn log_level(&self) -> Option<tracing::Level> {
        self.log_level
            .as_deref()
            .and_then(|level| tracing::Level::from_str(level).ok())
    }

    /// Tail poll interval, falling back to the built-in default
    pub fn tail_interval(&self) -> Duration {
        Duration::from_secs(self.tail.interval.unwrap_or(DEFAULT_TAIL_INTERVAL_SECS))
    }

    /// Drift options with the file's interval and timeout applied
    pub fn drift_options(&self, wait: bool) -> DriftOptions {
        let defaults = DriftOptions::default();
        DriftOptions {
            wait,
            poll_interval: self
                .drift
                .poll_interval
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            timeout: match self.drift.timeout {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.timeout,
            },
        }
    }
}
