//! Environment variable lookup.
//!
//! Responsibilities:
//! - Read a single environment variable by an optional name.
//! - Tolerate absent or invalid names by reporting the variable as unset.
//!
//! Does NOT handle:
//! - Type coercion. Environment values are always strings.
//! - Prefixing. The resolver builds the effective name before calling in.
//!
//! Invariants:
//! - Lookups never panic and never raise; failure means "unset".
//! - An empty-string value is a set value and is returned as-is.

use serde_yaml::Value;

/// A name the host environment cannot hold: empty, or containing `=` or NUL.
fn is_invalid_name(name: &str) -> bool {
    name.is_empty() || name.contains('=') || name.contains('\0')
}

/// Read an environment variable, returning None if the name is absent,
/// invalid, or unset.
pub fn env_value(name: Option<&str>) -> Option<String> {
    let name = name?;
    if is_invalid_name(name) {
        tracing::debug!(name, "Skipping lookup of invalid environment variable name");
        return None;
    }

    let raw = std::env::var_os(name)?;
    match raw.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            tracing::warn!(name, "Environment variable is not valid UTF-8, converting lossily");
            Some(raw.to_string_lossy().into_owned())
        }
    }
}

/// Read an environment variable, returning `default` if it is not available.
pub fn get_env_value(name: Option<&str>, default: impl Into<Value>) -> Value {
    match env_value(name) {
        Some(value) => Value::String(value),
        None => default.into(),
    }
}
