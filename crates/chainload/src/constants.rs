//! Centralized constants for the chainload crate.
//!
//! Default names and reserved identifiers shared by the loader and the
//! session builder.

// =============================================================================
// File Loading
// =============================================================================

/// Settings file name used when a caller does not supply one.
pub const DEFAULT_SETTINGS_FILE: &str = "config.yaml";

/// Environment variable that disables `.env` loading when set to `true` or `1`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Session Options
// =============================================================================

/// Names an extra session option may not use.
///
/// Covers every named session field plus the cache slots. The second group
/// keeps the long-form names that older configuration code passes around.
pub const RESERVED_OPTION_NAMES: &[&str] = &[
    "filename",
    "attempt_fallback",
    "prefix",
    "parser_config",
    "extra_options",
    "file_object",
    "last_value",
    // Long-form aliases
    "attempt_getenv_on_file_option",
    "environment_variable_prefix",
    "yaml_loader",
    "extra_options_dict",
];

/// Returns true if `name` collides with a reserved session option.
pub fn is_reserved_option(name: &str) -> bool {
    RESERVED_OPTION_NAMES.contains(&name)
}
