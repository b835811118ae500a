//! Configuration management for CyberForge
//!
//! [`AppConfig`] holds user settings loaded from a TOML file, and [`paths`]
//! locates the platform config and data directories.

pub mod app_config;
pub mod paths;

pub use app_config::*;

use thiserror::Error;

/// Errors loading, saving or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write configuration {path}: {message}")]
    Write { path: String, message: String },

    #[error("Configuration parsing failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
