//! Precedence resolution for a single configuration value.
//!
//! Sources, lowest to highest:
//! 1. The caller's default.
//! 2. The settings mapping, under `file_option` (non-null values only).
//! 3. The declared environment variable, `prefix + environment_variable`.
//! 4. Only when (3) is unset and fallback is enabled: the environment
//!    variable named after the file option, `prefix + file_option`.
//!
//! A set declared variable always wins outright and (4) is skipped.
//! Environment values are returned as strings with no coercion.

use serde_yaml::Value;

use crate::env::env_value;
use crate::error::ChainloadError;
use crate::settings::{Settings, lookup_option};

/// Effective environment name for `name` under `prefix`.
///
/// A `None` name stays `None` even with a prefix, so a bare prefix is never
/// looked up as if it were a variable name.
fn prefixed(prefix: Option<&str>, name: Option<&str>) -> Option<String> {
    let name = name?;
    Some(match prefix {
        Some(prefix) => format!("{prefix}{name}"),
        None => name.to_string(),
    })
}

/// Resolve one value from a default, a settings mapping, and the environment.
///
/// Load the settings once and pass them to every call; this function never
/// touches the filesystem.
///
/// # Errors
///
/// Returns `ChainloadError::MissingFileObject` if `file_object` is `None`.
/// Pass an empty mapping to resolve from the environment and default only.
pub fn resolve(
    file_option: Option<&str>,
    environment_variable: Option<&str>,
    default: impl Into<Value>,
    file_object: Option<&Settings>,
    attempt_fallback: bool,
    prefix: Option<&str>,
) -> Result<Value, ChainloadError> {
    let settings = file_object.ok_or(ChainloadError::MissingFileObject)?;

    let mut value = default.into();
    if let Some(found) = lookup_option(settings, file_option).non_null() {
        tracing::trace!(option = ?file_option, "Resolved from settings file");
        value = found.clone();
    }

    let declared = prefixed(prefix, environment_variable);
    if let Some(env) = env_value(declared.as_deref()) {
        tracing::trace!(variable = ?declared, "Resolved from environment variable");
        return Ok(Value::String(env));
    }

    if attempt_fallback {
        let fallback = prefixed(prefix, file_option);
        if let Some(env) = env_value(fallback.as_deref()) {
            tracing::trace!(variable = ?fallback, "Resolved from fallback environment variable");
            return Ok(Value::String(env));
        }
    }

    Ok(value)
}
