//! Search path helpers for settings files.
//!
//! Responsibilities:
//! - Build the ordered list of candidate paths for a settings file name.
//! - Locate the platform configuration directory via the `directories` crate.
//!
//! Does NOT handle:
//! - File I/O operations.

use std::path::{Path, PathBuf};

/// Returns the platform configuration directory for `app_name`.
///
/// - Linux: `~/.config/<app_name>`
/// - macOS: `~/Library/Application Support/<app_name>`
/// - Windows: `%AppData%\<app_name>\config`
pub(crate) fn project_config_dir(app_name: &str) -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Candidate paths for `file_name`, in search order.
///
/// The search root comes first when configured. An absolute `file_name`
/// replaces the root on join, so it is only tried once.
pub(crate) fn candidate_paths(search_root: Option<&Path>, file_name: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(root) = search_root {
        candidates.push(root.join(file_name));
    }
    let as_given = file_name.to_path_buf();
    if !candidates.contains(&as_given) {
        candidates.push(as_given);
    }
    candidates
}
