//! Stateful resolution session.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ChainloadSetup` that validates session options.
//! - Cache one settings mapping per session and resolve values against it.
//!
//! Does NOT handle:
//! - The precedence rules themselves (delegated to `resolve`).
//! - File search and parsing (delegated to `loader`).
//!
//! Invariants / Assumptions:
//! - Extra option names are checked against reserved names at build time.
//! - The settings mapping is loaded at most once and never reloaded.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod chainloader;

pub use builder::{ChainloadSetup, SettingsSource};
pub use chainloader::Chainloader;

#[cfg(test)]
mod tests;
