//! Parsed settings mapping and option lookup.
//!
//! Responsibilities:
//! - Name the mapping type produced by the file loader.
//! - Look up a single top-level option, telling a missing key apart from an
//!   explicit null.
//!
//! Does NOT handle:
//! - Nested-path lookups. Keys are top-level only.

use serde_yaml::Value;

/// A parsed settings file: top-level keys mapped to arbitrary YAML values.
pub type Settings = serde_yaml::Mapping;

/// Result of looking up one option.
///
/// `Missing` and `Null` are kept apart here and collapsed by the resolver;
/// neither ever reaches a caller of `resolve`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Lookup<'a> {
    Missing,
    Null,
    Found(&'a Value),
}

impl<'a> Lookup<'a> {
    /// The found value, treating an explicit null the same as a missing key.
    pub(crate) fn non_null(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Null => None,
        }
    }
}

pub(crate) fn lookup_option<'a>(settings: &'a Settings, key: Option<&str>) -> Lookup<'a> {
    let Some(key) = key else {
        return Lookup::Missing;
    };
    match settings.get(key) {
        None => Lookup::Missing,
        Some(Value::Null) => Lookup::Null,
        Some(value) => Lookup::Found(value),
    }
}

/// Get an option from a settings mapping.
///
/// Returns the stored value when `key` is present (an explicit null is
/// returned as `Value::Null`), otherwise `default`. A `None` key always
/// yields `default`.
pub fn get_option(settings: &Settings, key: Option<&str>, default: impl Into<Value>) -> Value {
    match lookup_option(settings, key) {
        Lookup::Missing => default.into(),
        Lookup::Null => Value::Null,
        Lookup::Found(value) => value.clone(),
    }
}
