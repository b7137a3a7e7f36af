//! Chain-loaded configuration values.
//!
//! This crate resolves one configuration value at a time from a fixed
//! precedence chain: a default, a parsed YAML/JSON settings file, and
//! environment variables.
//!
//! ```no_run
//! use chainload::{ChainloadSetup, FileFormat};
//!
//! let config = ChainloadSetup::from_file("settings.yaml")
//!     .with_prefix("WEBAPP_")
//!     .with_parser_config(FileFormat::Yaml)
//!     .build()?;
//!
//! let environment = config.get_value(Some("environment"), Some("ENV"), "debug", None)?;
//! let port: u16 = config.get_parsed(Some("port"), None, 8080)?;
//! # Ok::<(), chainload::ChainloadError>(())
//! ```

pub mod constants;
mod env;
mod error;
mod loader;
mod resolve;
mod session;
mod settings;

pub use env::{env_value, get_env_value};
pub use error::ChainloadError;
pub use loader::{FileFormat, SettingsLoader, load_file};
pub use resolve::resolve;
pub use session::{ChainloadSetup, Chainloader, SettingsSource};
pub use settings::{Settings, get_option};

pub use serde_yaml::Value;
