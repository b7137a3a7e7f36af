//! Structured-data formats a settings file may use.

use std::path::Path;

use serde_yaml::Value;

use crate::error::ChainloadError;

/// Parser used for settings file content.
///
/// YAML is the default; JSON documents are valid YAML, so `Yaml` reads both.
/// `Json` selects the strict JSON parser instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Yaml,
    Json,
}

impl FileFormat {
    /// Parse `content` into a YAML value tree.
    ///
    /// `path` is used only to label errors.
    pub(crate) fn parse(self, content: &str, path: &Path) -> Result<Value, ChainloadError> {
        match self {
            FileFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|source| ChainloadError::ParseYaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            FileFormat::Json => {
                let json: serde_json::Value =
                    serde_json::from_str(content).map_err(|source| ChainloadError::ParseJson {
                        path: path.to_path_buf(),
                        source,
                    })?;
                serde_yaml::to_value(json).map_err(|source| ChainloadError::ParseYaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
}
