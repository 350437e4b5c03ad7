//! Versioned settings store for Encore
//!
//! Plugin settings live in a `config.toml` inside a directory the host hands
//! us. Toggle commands mutate one field at a time: each mutation bumps a
//! version counter and rewrites the file atomically before the in-memory copy
//! changes, so a failed write never leaves settings half-applied. The admin
//! shared secret sits in a sibling `secret.txt` and is re-read on every
//! check, allowing rotation without a restart.

mod model;
mod store;

pub use model::{CardVariant, LogSettings, Settings};
pub use store::{SECRET_FILE, SETTINGS_FILE, SettingsStore};

/// Error types for settings operations
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("admin secret is not configured")]
    MissingSecret,
}

/// Result type for settings operations
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
