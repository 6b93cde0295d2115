//! Environment-variable parsing shared by the configuration types of the
//! database and search crates.
//!
//! Unset or empty variables fall back to the provided default. A variable
//! that is set but does not parse is a [`Error::Config`], not a silent
//! fallback.

use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};

/// Read `key` from the environment and parse it, or return `default`.
pub fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_or(key, std::env::var(key).ok().as_deref(), default)
}

/// Read a boolean flag from the environment.
///
/// Recognizes "true", "1", "yes", "on" and "false", "0", "no", "off"
/// (case-insensitive).
pub fn env_flag(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key).ok().as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => parse_flag(raw)
            .ok_or_else(|| Error::Config(format!("{key} is not a boolean: {raw:?}"))),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => {
            debug!(key, value, "Configuration override from environment");
            value
                .parse()
                .map_err(|e| Error::Config(format!("{key} has invalid value {value:?}: {e}")))
        }
    }
}
