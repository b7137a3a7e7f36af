//! Settings file loader implementation.
//!
//! Responsibilities:
//! - Walk the search path and read the first file that opens.
//! - Parse the content with the configured `FileFormat`.
//!
//! Does NOT handle:
//! - Deciding precedence between the file and the environment (see `resolve`).
//!
//! Invariants:
//! - Only the first readable candidate is parsed; later candidates are ignored.
//! - Empty documents load as an empty mapping.
//! - Top-level scalars and sequences are rejected with `NotAMapping`.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::format::FileFormat;
use super::path::{candidate_paths, project_config_dir};
use crate::error::ChainloadError;
use crate::settings::Settings;

/// Loads settings files from a two-step search path.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    search_root: Option<PathBuf>,
    format: FileFormat,
    required: bool,
}

impl SettingsLoader {
    /// Create a loader with no search root, YAML parsing, and lenient
    /// not-found handling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory tried before the file name as given.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    /// Use the platform configuration directory for `app_name` as the
    /// search root.
    ///
    /// Leaves the search root unchanged if no home directory can be found.
    pub fn with_project_config_dir(mut self, app_name: &str) -> Self {
        match project_config_dir(app_name) {
            Some(dir) => self.search_root = Some(dir),
            None => tracing::warn!(
                app_name,
                "Unable to determine config directory, keeping current search root"
            ),
        }
        self
    }

    /// Set the parser used for file content.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    /// Treat "not found on any search path" as an error instead of loading
    /// an empty mapping.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn search_root(&self) -> Option<&Path> {
        self.search_root.as_deref()
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Load and parse `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A file opens but does not parse, or is not a mapping.
    /// - The loader is `required` and no candidate could be read.
    pub fn load(&self, file_name: impl AsRef<Path>) -> Result<Settings, ChainloadError> {
        let file_name = file_name.as_ref();
        let candidates = candidate_paths(self.search_root(), file_name);
        let mut last_failure: Option<(PathBuf, std::io::Error)> = None;

        for path in &candidates {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    tracing::debug!(path = %path.display(), "Loaded settings file");
                    return self.parse_settings(&content, path);
                }
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "Settings file not readable, trying next location"
                    );
                    last_failure = Some((path.clone(), e));
                }
            }
        }

        if self.required {
            return Err(match last_failure {
                Some((path, source)) if source.kind() != std::io::ErrorKind::NotFound => {
                    ChainloadError::Read { path, source }
                }
                _ => ChainloadError::FileNotFound {
                    name: file_name.display().to_string(),
                    searched: candidates,
                },
            });
        }

        tracing::warn!(
            file = %file_name.display(),
            "Settings file not found, using empty settings"
        );
        Ok(Settings::new())
    }

    fn parse_settings(&self, content: &str, path: &Path) -> Result<Settings, ChainloadError> {
        if content.trim().is_empty() {
            return Ok(Settings::new());
        }
        match self.format.parse(content, path)? {
            Value::Mapping(settings) => Ok(settings),
            Value::Null => Ok(Settings::new()),
            _ => Err(ChainloadError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load a settings file using the default search path.
///
/// Equivalent to `SettingsLoader::new().with_format(format).load(file_name)`.
pub fn load_file(file_name: impl AsRef<Path>, format: FileFormat) -> Result<Settings, ChainloadError> {
    SettingsLoader::new().with_format(format).load(file_name)
}
