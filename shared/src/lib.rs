//! CyberForge Shared Library
//!
//! This crate contains the security utilities, data models and persistence
//! helpers used by the CyberForge tooling. Every utility is a pure function
//! that can be called from any number of threads without coordination.
//!
//! # Features
//!
//! - **Validation**: IP, domain, URL, email and indicator-of-compromise checks
//! - **Passwords**: additive strength scoring and random password generation
//! - **Mock hashing**: deterministic, digest-shaped hex strings (not cryptographic)
//! - **Network**: port range parsing and private IPv4 classification
//! - **Persistence**: a versioned cart/wishlist store over a key-value backend
//! - **Simulation**: stoppable periodic tasks driving scan and metric simulations
//!
//! # Usage
//!
//! ```rust
//! use cyberforge_shared::network::{is_private_ipv4, parse_port_range};
//! use cyberforge_shared::utils::{mock_hash, PasswordAnalyzer};
//!
//! let ports = parse_port_range("22,80-82,99999");
//! assert_eq!(ports.to_vec(), vec![22, 80, 81, 82]);
//!
//! assert!(is_private_ipv4("172.31.0.5"));
//! assert_eq!(mock_hash("abc", "MD5").len(), 32);
//!
//! let assessment = PasswordAnalyzer::assess("correct horse");
//! assert!(assessment.score <= 100);
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod network;
pub mod utils;

// Re-export commonly used types for convenience
pub use models::{
    CartItem, HostStatus, IndicatorOfCompromise, IocType, PortInfo, PortStatus, ScanResult,
    Severity,
};

// Re-export config functionality
pub use config::{AppConfig, DashboardConfig, LoggingSettings, ScannerConfig, StorageSettings};

// Re-export persistence and scheduling
pub use core::{
    CartState, CartStore, CartSummary, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
    MetricsSimulation, PeriodicTask, ScanSimulation, StoreError, StoreResult,
};

// Re-export network helpers
pub use network::{
    is_private_ipv4, parse_port_range, parse_port_range_with, ParseMode, PortRangeError, PortSet,
};

// Re-export utilities
pub use utils::*;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library configuration and constants
pub mod constants {
    /// Minimum password length that earns the base length points
    pub const PASSWORD_MIN_LENGTH: usize = 8;

    /// Password length that earns the bonus length points
    pub const PASSWORD_RECOMMENDED_LENGTH: usize = 12;

    /// Length of passwords produced by the generator
    pub const GENERATED_PASSWORD_LENGTH: usize = 16;

    /// Default length of identifiers from `generate_secure_id`
    pub const SECURE_ID_LENGTH: usize = 16;

    /// Port range scanned when none is given
    pub const DEFAULT_PORT_RANGE: &str = "1-1000";

    /// Lowest valid TCP/UDP port
    pub const MIN_PORT: u32 = 1;

    /// Highest valid TCP/UDP port
    pub const MAX_PORT: u32 = 65535;

    /// Reserved IPv4 blocks recognised by `is_private_ipv4`
    pub const PRIVATE_IP_RANGES: &[&str] = &[
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
    ];

    /// Well-known ports and the service usually listening on them
    pub const COMMON_PORTS: &[(u16, &str)] = &[
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (80, "HTTP"),
        (110, "POP3"),
        (143, "IMAP"),
        (443, "HTTPS"),
        (993, "IMAPS"),
        (995, "POP3S"),
        (1433, "MSSQL"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5432, "PostgreSQL"),
        (5900, "VNC"),
        (6379, "Redis"),
        (8080, "HTTP-Alt"),
        (8443, "HTTPS-Alt"),
        (27017, "MongoDB"),
    ];

    /// Fixed message returned when mock decryption cannot decode its input
    pub const DECRYPTION_FAILED_MESSAGE: &str = "Decryption failed - invalid key or data";
}
