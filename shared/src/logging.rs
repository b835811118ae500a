//! Logging infrastructure for the CyberForge shared library
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once at startup to install a formatter on stderr.

use std::str::FromStr;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Configuration that the subscriber was installed with
static ACTIVE_CONFIG: OnceLock<LoggingConfig> = OnceLock::new();

/// Logging configuration structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level filter, overridden by `RUST_LOG` when set
    pub level: Level,
    /// Whether to include thread ids and names
    pub include_thread_info: bool,
    /// Whether to include the event target (module path)
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            include_thread_info: false,
            include_target: true,
        }
    }
}

impl LoggingConfig {
    /// Build from a level name such as `"debug"`; unknown names fall back to info
    pub fn from_level_name(level: &str) -> Self {
        Self {
            level: Level::from_str(level).unwrap_or(Level::INFO),
            ..Self::default()
        }
    }

    /// Same configuration with debug output forced on
    pub fn with_debug(mut self, enabled: bool) -> Self {
        if enabled && self.level < Level::DEBUG {
            self.level = Level::DEBUG;
        }
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this again after a
/// subscriber is in place is a no-op and returns `false`.
pub fn init_logging(config: &LoggingConfig) -> bool {
    if ACTIVE_CONFIG.get().is_some() {
        return false;
    }

    let installed = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_writer(std::io::stderr)
        .with_target(config.include_target)
        .with_thread_ids(config.include_thread_info)
        .with_thread_names(config.include_thread_info)
        .try_init()
        .is_ok();

    // Another subscriber may have been installed outside this module
    let _ = ACTIVE_CONFIG.set(config.clone());
    if installed {
        tracing::debug!("Logging initialized at {}", config.level);
    }
    installed
}

/// Whether [`init_logging`] has run
pub fn is_initialized() -> bool {
    ACTIVE_CONFIG.get().is_some()
}

/// Configuration passed to the first [`init_logging`] call
pub fn active_config() -> Option<&'static LoggingConfig> {
    ACTIVE_CONFIG.get()
}
