//! Settings file loading.
//!
//! Responsibilities:
//! - Locate a settings file on a two-step search path (search root, then the
//!   name as given).
//! - Parse YAML or JSON content into a `Settings` mapping.
//!
//! Does NOT handle:
//! - Caching loaded settings (see `session`).
//! - Looking up individual options (see `settings`).
//!
//! Invariants / Assumptions:
//! - A file that cannot be opened on either path loads as an empty mapping,
//!   unless the loader is marked `required`.
//! - A file that opens but fails to parse is always an error naming the file.

mod file;
mod format;
mod path;

pub use file::{SettingsLoader, load_file};
pub use format::FileFormat;
