//! Error types for settings loading and value resolution.
//!
//! Responsibilities:
//! - Define error variants for every configuration failure the crate raises.
//! - Carry enough context (paths, option names) to point at the culprit.
//!
//! Does NOT handle:
//! - Missing keys or unset environment variables. Those are normal and are
//!   absorbed by the precedence chain, never raised.
//!
//! Invariants:
//! - Parse errors always name the offending file.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading settings or resolving a value.
#[derive(Error, Debug)]
pub enum ChainloadError {
    /// `resolve` was called without a settings mapping at all.
    ///
    /// An empty mapping is fine; `None` means nothing was loaded.
    #[error(
        "Expected a settings mapping to search. Pass an empty mapping to skip file loading."
    )]
    MissingFileObject,

    /// Neither search path could be opened and the loader requires the file.
    #[error("Settings file '{name}' not found (searched: {searched:?})")]
    FileNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Failed to read settings file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file at {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse settings file at {path}: {source}")]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file parsed, but its top level is a scalar or a sequence.
    #[error("Settings file at {path} does not contain a top-level mapping")]
    NotAMapping { path: PathBuf },

    /// An extra session option collides with a reserved name.
    #[error("Extra option '{name}' collides with a reserved session option")]
    ReservedOption { name: String },

    /// A resolved value could not be converted into the requested type.
    #[error("Invalid value for {option}: {source}")]
    Convert {
        option: String,
        source: serde_yaml::Error,
    },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ChainloadError {
    /// Whether this error means the settings content itself is unusable.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            ChainloadError::ParseYaml { .. }
                | ChainloadError::ParseJson { .. }
                | ChainloadError::NotAMapping { .. }
        )
    }
}
