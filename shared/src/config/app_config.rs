//! Application configuration for CyberForge
//!
//! Settings are stored as TOML. Every section and field has a default, so a
//! partial file (or none at all) yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{paths, ConfigError, ConfigResult};
use crate::constants::DEFAULT_PORT_RANGE;
use crate::core::simulation::DEFAULT_HOST_TOTAL;
use crate::logging::LoggingConfig;
use crate::network::{parse_port_range_with, ParseMode};

/// Main application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Network scanner settings
    pub scanner: ScannerConfig,

    /// Dashboard refresh settings
    pub dashboard: DashboardConfig,

    /// Cart and wishlist storage
    pub storage: StorageSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Network scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Port spec used when none is given
    pub default_port_range: String,

    /// Reject malformed port tokens instead of dropping them
    pub strict_port_parsing: bool,

    /// Milliseconds between simulated scan progress ticks
    pub progress_interval_ms: u64,

    /// Host count used when the target range cannot be sized
    pub host_total: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            default_port_range: DEFAULT_PORT_RANGE.to_string(),
            strict_port_parsing: false,
            progress_interval_ms: 100,
            host_total: DEFAULT_HOST_TOTAL,
        }
    }
}

impl ScannerConfig {
    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_port_parsing {
            ParseMode::Strict
        } else {
            ParseMode::default()
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Milliseconds between metric updates
    pub refresh_interval_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 3000,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory for the key-value store; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl StorageSettings {
    /// Configured directory, or `<platform data dir>/cyberforge`
    pub fn resolve_data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => paths::expand_home_path(&dir.to_string_lossy()),
            None => paths::data_directory(),
        }
    }
}

/// Logging configuration as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,

    /// Whether to include thread information
    pub include_thread_info: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            include_thread_info: false,
        }
    }
}

impl LoggingSettings {
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            include_thread_info: self.include_thread_info,
            ..LoggingConfig::from_level_name(&self.level)
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults. The loaded configuration is
    /// validated before it is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from: {:?}", path);

        if !path.exists() {
            debug!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Configuration loaded successfully from: {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let write_error = |e: std::io::Error| ConfigError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(write_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).map_err(write_error)?.permissions();
            perms.set_mode(0o600); // Owner read/write only
            fs::set_permissions(path, perms).map_err(write_error)?;
        }

        info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanner.progress_interval_ms == 0 {
            return Err(invalid(
                "scanner.progress_interval_ms",
                "must be greater than 0",
            ));
        }

        if self.scanner.host_total == 0 {
            return Err(invalid("scanner.host_total", "must be greater than 0"));
        }

        let ports = parse_port_range_with(
            &self.scanner.default_port_range,
            self.scanner.parse_mode(),
        )
        .map_err(|e| invalid("scanner.default_port_range", &e.to_string()))?;
        if ports.is_empty() {
            return Err(invalid(
                "scanner.default_port_range",
                "must contain at least one port in 1-65535",
            ));
        }

        if self.dashboard.refresh_interval_ms == 0 {
            return Err(invalid(
                "dashboard.refresh_interval_ms",
                "must be greater than 0",
            ));
        }
        if self.dashboard.refresh_interval_ms < 250 {
            warn!(
                "Very short dashboard refresh interval ({} ms)",
                self.dashboard.refresh_interval_ms
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                &format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scanner.default_port_range, "1-1000");
        assert_eq!(config.scanner.progress_interval(), Duration::from_millis(100));
        assert_eq!(config.scanner.host_total, 254);
        assert_eq!(config.dashboard.refresh_interval(), Duration::from_secs(3));
        assert_eq!(config.logging.level, "info");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scanner]
            strict_port_parsing = true

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.scanner.strict_port_parsing);
        assert_eq!(config.scanner.parse_mode(), ParseMode::Strict);
        assert_eq!(config.scanner.default_port_range, "1-1000");
        assert_eq!(config.dashboard.refresh_interval_ms, 3000);
        assert_eq!(
            config.logging.to_logging_config().level,
            tracing::Level::DEBUG
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.scanner.progress_interval_ms = 0;
        assert_matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "scanner.progress_interval_ms"
        );
        config.scanner.progress_interval_ms = 100;

        config.scanner.host_total = 0;
        assert!(config.validate().is_err());
        config.scanner.host_total = 254;

        config.scanner.default_port_range = "0,70000".to_string();
        assert_matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "scanner.default_port_range"
        );

        config.scanner.default_port_range = "22,abc".to_string();
        if !cfg!(feature = "strict-ports") {
            assert!(config.validate().is_ok());
        }
        config.scanner.strict_port_parsing = true;
        assert!(config.validate().is_err());
        config.scanner.default_port_range = "22,80-90".to_string();
        assert!(config.validate().is_ok());

        config.dashboard.refresh_interval_ms = 0;
        assert!(config.validate().is_err());
        config.dashboard.refresh_interval_ms = 3000;

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut config = AppConfig::default();
        config.scanner.default_port_range = "22,80,443".to_string();
        config.storage.data_dir = Some(PathBuf::from("/var/lib/cyberforge"));

        config.save(temp_file.path()).unwrap();
        let loaded = AppConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        AppConfig::default().save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempdir().unwrap();
        let loaded = AppConfig::load(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[scanner\nhost_total = ").unwrap();
        assert_matches!(AppConfig::load(&path), Err(ConfigError::Parse(_)));

        fs::write(&path, "[scanner]\nhost_total = 0\n").unwrap();
        assert_matches!(AppConfig::load(&path), Err(ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_data_dir_resolution() {
        let mut storage = StorageSettings::default();
        assert!(storage.resolve_data_dir().unwrap().ends_with("cyberforge"));

        storage.data_dir = Some(PathBuf::from("/tmp/cf-store"));
        assert_eq!(
            storage.resolve_data_dir().unwrap(),
            PathBuf::from("/tmp/cf-store")
        );
    }
}
