//! # Config Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Config Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │      File       │  │     Parsing     │  │       Pricing           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  Toml           │  │  Invalid                │ │
//! │  │  NoConfigPath   │  │  TomlSerialize  │  │  Core (CoreError)       │ │
//! │  │                 │  │  Json           │  │                         │ │
//! │  │                 │  │  UnsupportedFmt │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use checkout_core::CoreError;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to write TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.toml` nor `.json`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// No explicit path and no platform config directory.
    #[error("No config path available")]
    NoConfigPath,

    #[error("Invalid pricing configuration: {0}")]
    Invalid(String),

    /// Prices or offers failed domain validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
