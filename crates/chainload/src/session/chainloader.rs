//! Resolution session with a lazily loaded settings cache.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::builder::SettingsSource;
use crate::error::ChainloadError;
use crate::loader::SettingsLoader;
use crate::resolve::resolve;
use crate::settings::Settings;

/// A configured resolution session.
///
/// Built by `ChainloadSetup`. Safe to share across threads; the settings
/// file is loaded on first use, under a lock, exactly once.
#[derive(Debug)]
pub struct Chainloader {
    source: SettingsSource,
    loader: SettingsLoader,
    attempt_fallback: bool,
    prefix: Option<String>,
    extra_options: BTreeMap<String, Value>,
    file_object: Mutex<Option<Arc<Settings>>>,
    last_value: Mutex<Option<Value>>,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// Neither guarded slot can be left half-written, so the data is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Chainloader {
    pub(crate) fn new(
        source: SettingsSource,
        loader: SettingsLoader,
        attempt_fallback: bool,
        prefix: Option<String>,
        extra_options: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            source,
            loader,
            attempt_fallback,
            prefix,
            extra_options,
            file_object: Mutex::new(None),
            last_value: Mutex::new(None),
        }
    }

    /// The settings mapping for this session, loading it on first access.
    ///
    /// A session without a settings source returns a fresh empty mapping
    /// and caches nothing.
    ///
    /// # Errors
    ///
    /// Propagates load errors (parse failures, or a missing file when the
    /// loader is `required`). A failed load is not cached, so a later call
    /// tries again.
    pub fn file_object(&self) -> Result<Arc<Settings>, ChainloadError> {
        let mut cached = lock(&self.file_object);
        if let Some(settings) = cached.as_ref() {
            return Ok(Arc::clone(settings));
        }

        let settings = match &self.source {
            SettingsSource::File(path) => Arc::new(self.loader.load(path)?),
            SettingsSource::Inline(settings) => Arc::new(settings.clone()),
            SettingsSource::None => return Ok(Arc::new(Settings::new())),
        };
        tracing::debug!(keys = settings.len(), "Cached session settings");
        *cached = Some(Arc::clone(&settings));
        Ok(settings)
    }

    /// Resolve a value through the precedence chain.
    ///
    /// `override_prefix` replaces the session prefix for this call only.
    pub fn get_value(
        &self,
        file_option: Option<&str>,
        environment_variable: Option<&str>,
        default: impl Into<Value>,
        override_prefix: Option<&str>,
    ) -> Result<Value, ChainloadError> {
        let settings = self.file_object()?;
        let prefix = override_prefix.or(self.prefix.as_deref());
        let value = resolve(
            file_option,
            environment_variable,
            default,
            Some(settings.as_ref()),
            self.attempt_fallback,
            prefix,
        )?;
        *lock(&self.last_value) = Some(value.clone());
        Ok(value)
    }

    /// Shorthand for `get_value(Some(file_option), None, Value::Null, None)`.
    ///
    /// With fallback enabled this reads `prefix + file_option` from the
    /// environment, then the settings file.
    pub fn get(&self, file_option: &str) -> Result<Value, ChainloadError> {
        self.get_value(Some(file_option), None, Value::Null, None)
    }

    /// Resolve a value and deserialize it into `T`.
    ///
    /// Environment values are strings, so a string that does not convert
    /// directly is re-read as a YAML scalar (`"8080"` becomes a number).
    pub fn get_parsed<T: DeserializeOwned>(
        &self,
        file_option: Option<&str>,
        environment_variable: Option<&str>,
        default: impl Into<Value>,
    ) -> Result<T, ChainloadError> {
        let value = self.get_value(file_option, environment_variable, default, None)?;
        let option = file_option
            .or(environment_variable)
            .unwrap_or("<unnamed>")
            .to_string();

        match serde_yaml::from_value::<T>(value.clone()) {
            Ok(parsed) => Ok(parsed),
            Err(source) => match value {
                Value::String(raw) => serde_yaml::from_str::<T>(&raw)
                    .map_err(|source| ChainloadError::Convert { option, source }),
                _ => Err(ChainloadError::Convert { option, source }),
            },
        }
    }

    /// Whether the fallback lookup under the file option's name is enabled.
    pub fn attempt_fallback(&self) -> bool {
        self.attempt_fallback
    }

    /// The session prefix. `Some("")` and `None` both leave names unchanged.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn loader(&self) -> &SettingsLoader {
        &self.loader
    }

    /// A caller-defined option attached at build time.
    pub fn extra_option(&self, name: &str) -> Option<&Value> {
        self.extra_options.get(name)
    }

    pub fn extra_options(&self) -> &BTreeMap<String, Value> {
        &self.extra_options
    }

    /// The most recent value returned by `get_value`, for diagnostics.
    pub fn last_value(&self) -> Option<Value> {
        lock(&self.last_value).clone()
    }
}
