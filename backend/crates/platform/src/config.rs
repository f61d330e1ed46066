//! Environment Configuration Helpers
//!
//! Typed readers over process environment variables. Unset and blank values
//! fall back to the supplied default; malformed values are configuration
//! errors rather than silent defaults.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};

/// Read a variable, treating unset and whitespace-only values as absent.
pub fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable that has no sensible default.
pub fn require_env(name: &str) -> AppResult<String> {
    env_string(name).ok_or_else(|| {
        AppError::internal(format!("{name} must be set"))
            .with_action(format!("Set {name} in the environment or .env"))
    })
}

/// Parse a variable, falling back to `default` when absent.
pub fn env_parse<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env_string(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

/// Duration given in whole seconds.
pub fn env_secs(name: &str, default_secs: u64) -> AppResult<Duration> {
    env_parse(name, default_secs).map(Duration::from_secs)
}

/// Duration given in whole milliseconds.
pub fn env_millis(name: &str, default_ms: u64) -> AppResult<Duration> {
    env_parse(name, default_ms).map(Duration::from_millis)
}

/// Comma separated list; empty items are dropped.
pub fn env_list(name: &str, default: &[&str]) -> Vec<String> {
    match env_string(name) {
        Some(raw) => split_list(&raw),
        None => default.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|e| {
        AppError::internal(format!("{name} has an invalid value {raw:?}: {e}"))
            .with_action(format!("Fix {name} in the environment or .env"))
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
