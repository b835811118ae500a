//! Cross-platform path utilities for CyberForge configuration
//!
//! Paths follow platform conventions via the `dirs` crate:
//! - Linux: ~/.config/cyberforge and ~/.local/share/cyberforge
//! - macOS: ~/Library/Application Support/cyberforge
//! - Windows: %APPDATA%\cyberforge

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Directory name used under the platform config and data roots
pub const APP_DIR_NAME: &str = "cyberforge";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the user's configuration directory for CyberForge
pub fn config_directory() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
        .context("Could not determine config directory")?
        .join(APP_DIR_NAME);

    Ok(config_dir)
}

/// Get the user's data directory for CyberForge
///
/// The cart and wishlist store lives here unless configured otherwise.
pub fn data_directory() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
        .context("Could not determine data directory")?
        .join(APP_DIR_NAME);

    Ok(data_dir)
}

/// Default location of the configuration file
pub fn default_config_file() -> Result<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory
pub fn expand_home_path(path: &str) -> Result<PathBuf> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home_dir = dirs::home_dir().context("Could not determine home directory")?;
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                Ok(home_dir)
            } else {
                Ok(home_dir.join(rest))
            }
        }
        None => Ok(PathBuf::from(path)),
    }
}
