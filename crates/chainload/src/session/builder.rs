//! Session builder implementation.
//!
//! Responsibilities:
//! - Collect session options (settings source, fallback toggle, prefix,
//!   parser configuration, extra options).
//! - Optionally load a `.env` file into the process environment.
//! - Validate options and build a `Chainloader`.
//!
//! Invariants:
//! - The prefix defaults to the empty string, not to "no prefix".
//! - Fallback lookup defaults to enabled.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_yaml::Value;

use super::chainloader::Chainloader;
use crate::constants::{DEFAULT_SETTINGS_FILE, DOTENV_DISABLED_VAR, is_reserved_option};
use crate::error::ChainloadError;
use crate::loader::{FileFormat, SettingsLoader};
use crate::settings::Settings;

/// Where a session gets its settings mapping from.
#[derive(Debug, Clone, Default)]
pub enum SettingsSource {
    /// Load this file name through the session's `SettingsLoader`.
    File(PathBuf),
    /// Use an already-parsed mapping.
    Inline(Settings),
    /// No settings; every lookup falls through to the environment and default.
    #[default]
    None,
}

impl From<Settings> for SettingsSource {
    fn from(settings: Settings) -> Self {
        SettingsSource::Inline(settings)
    }
}

impl From<PathBuf> for SettingsSource {
    fn from(path: PathBuf) -> Self {
        SettingsSource::File(path)
    }
}

impl From<&str> for SettingsSource {
    fn from(path: &str) -> Self {
        SettingsSource::File(PathBuf::from(path))
    }
}

/// Builder for a `Chainloader` session.
#[derive(Debug, Clone)]
pub struct ChainloadSetup {
    source: SettingsSource,
    attempt_fallback: bool,
    prefix: Option<String>,
    loader: SettingsLoader,
    extra_options: BTreeMap<String, Value>,
}

impl Default for ChainloadSetup {
    fn default() -> Self {
        Self::new(SettingsSource::None)
    }
}

impl ChainloadSetup {
    /// Create a session builder for `source` with default options.
    pub fn new(source: impl Into<SettingsSource>) -> Self {
        Self {
            source: source.into(),
            attempt_fallback: true,
            prefix: Some(String::new()),
            loader: SettingsLoader::new(),
            extra_options: BTreeMap::new(),
        }
    }

    /// Create a session builder that loads `path` on first use.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(SettingsSource::File(path.into()))
    }

    /// Create a session builder for the default settings file name.
    pub fn from_default_file() -> Self {
        Self::from_file(DEFAULT_SETTINGS_FILE)
    }

    /// Create a session builder around an already-parsed mapping.
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(SettingsSource::Inline(settings))
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ChainloadError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ChainloadError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ChainloadError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        Self::map_dotenv_result(dotenvy::dotenv().map(|_| ()))?;
        Ok(self)
    }

    /// Load environment variables from a specific .env file.
    ///
    /// Subject to the same `DOTENV_DISABLED` gate as `load_dotenv()`. A
    /// missing file is ignored.
    pub fn load_dotenv_from(self, path: impl Into<PathBuf>) -> Result<Self, ChainloadError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        Self::map_dotenv_result(dotenvy::from_path(path.into()))?;
        Ok(self)
    }

    fn map_dotenv_result(result: Result<(), dotenvy::Error>) -> Result<(), ChainloadError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if Self::is_not_found(&e) => Ok(()),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ChainloadError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ChainloadError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ChainloadError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Enable or disable the fallback lookup under the file option's name.
    pub fn with_attempt_fallback(mut self, enabled: bool) -> Self {
        self.attempt_fallback = enabled;
        self
    }

    /// Prefix prepended to every environment variable name.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Look up environment variables without any prefix.
    pub fn without_prefix(mut self) -> Self {
        self.prefix = None;
        self
    }

    /// Set the parser used when the settings source is a file.
    pub fn with_parser_config(mut self, format: FileFormat) -> Self {
        self.loader = self.loader.with_format(format);
        self
    }

    /// Replace the loader used when the settings source is a file.
    pub fn with_loader(mut self, loader: SettingsLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Directory searched before the file name as given.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.loader = self.loader.with_search_root(root);
        self
    }

    /// Attach caller-defined options to the session.
    ///
    /// Names are validated in `build()`.
    pub fn with_extra_options(mut self, options: BTreeMap<String, Value>) -> Self {
        self.extra_options.extend(options);
        self
    }

    /// Attach a single caller-defined option to the session.
    pub fn with_extra_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_options.insert(name.into(), value.into());
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Returns `ChainloadError::ReservedOption` if an extra option name
    /// collides with a reserved session option.
    pub fn build(self) -> Result<Chainloader, ChainloadError> {
        if let Some(name) = self
            .extra_options
            .keys()
            .find(|name| is_reserved_option(name))
        {
            return Err(ChainloadError::ReservedOption { name: name.clone() });
        }

        Ok(Chainloader::new(
            self.source,
            self.loader,
            self.attempt_fallback,
            self.prefix,
            self.extra_options,
        ))
    }
}
