//! Settings file parser with environment variable substitution

use crate::{ConfigError, Result, Settings};
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// Default settings location: `<config_dir>/cfn/config.yaml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cfn").join("config.yaml"))
}

/// Load settings from `explicit`, or from [`default_path`] if that file exists.
///
/// An explicit path must exist; a missing default file just yields defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        return parse_file(path);
    }

    match default_path() {
        Some(path) if path.is_file() => parse_file(&path),
        _ => {
            debug!("No settings file found, using defaults");
            Ok(Settings::default())
        }
    }
}

/// Parse a YAML settings file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    debug!("Loading settings from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse YAML settings from a string
pub fn parse_str(content: &str) -> Result<Settings> {
    let substituted = substitute_env_vars(content)?;

    // An empty or comment-only file is valid and means "all defaults"
    let value: serde_yaml::Value = serde_yaml::from_str(&substituted)?;
    let settings: Settings = if value.is_null() {
        Settings::default()
    } else {
        serde_yaml::from_value(value)?
    };

    validate(&settings)?;
    Ok(settings)
}

/// Validate settings values
pub fn validate(settings: &Settings) -> Result<()> {
    if let Some(level) = &settings.log_level {
        if tracing::Level::from_str(level).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log_level '{}', expected one of error, warn, info, debug, trace",
                level
            )));
        }
    }

    if settings.region.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::ValidationError("region must not be empty".to_string()));
    }

    if settings.tail.interval == Some(0) {
        return Err(ConfigError::ValidationError(
            "tail.interval must be greater than 0".to_string(),
        ));
    }

    if settings.drift.poll_interval == Some(0) {
        return Err(ConfigError::ValidationError(
            "drift.poll_interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Substitute `${VAR}` and `${VAR:-default}` references with environment values
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();

    let result = ENV_VAR.replace_all(input, |caps: &Captures<'_>| {
        let var_expr = &caps[1];

        // Handle default values: ${VAR:-default}
        let (var_name, default_value) = match var_expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (var_expr, None),
        };

        match (std::env::var(var_name), default_value) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                missing.push(var_name.to_string());
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(ConfigError::EnvVarNotFound(missing.join(", ")));
    }

    Ok(result.into_owned())
}
