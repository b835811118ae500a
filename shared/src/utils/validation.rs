//! Validation utilities for CyberForge
//!
//! Format checks for the values that show up in threat feeds: IP addresses,
//! domains, URLs, email addresses and hashes. Every check returns `false` on
//! malformed input rather than an error.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::{MAX_PORT, MIN_PORT};
use crate::models::{IndicatorOfCompromise, IocType};

static IPV4_PATTERN: OnceLock<Regex> = OnceLock::new();
static IPV6_PATTERN: OnceLock<Regex> = OnceLock::new();
static DOMAIN_PATTERN: OnceLock<Regex> = OnceLock::new();
static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
static HASH_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Compile a hardcoded pattern once and hand out the cached regex
#[allow(clippy::expect_used)]
fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hardcoded pattern must compile"))
}

/// Validation result with detailed error information
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to this validation result
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.is_valid = false;
    }

    /// Add a warning to this validation result
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        if !other.is_valid {
            self.is_valid = false;
        }
    }
}

/// Validate an IPv4 or IPv6 address
///
/// IPv4 must be four dotted octets in 0-255. IPv6 must be written out as
/// eight groups of one to four hex digits; `::` shorthand is not accepted.
pub fn is_valid_ip(ip: &str) -> bool {
    let ipv4 = cached(
        &IPV4_PATTERN,
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    );
    let ipv6 = cached(&IPV6_PATTERN, r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$");
    ipv4.is_match(ip) || ipv6.is_match(ip)
}

/// Validate a domain name
///
/// Labels are 1-63 ASCII alphanumerics, hyphens allowed only inside a label.
pub fn is_valid_domain(domain: &str) -> bool {
    cached(
        &DOMAIN_PATTERN,
        r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)*[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .is_match(domain)
}

/// Validate a URL
///
/// Structural check only: the string must parse as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

/// Validate an email address
///
/// Deliberately permissive: `local@domain.tld` with no whitespace or extra `@`.
pub fn is_valid_email(email: &str) -> bool {
    cached(&EMAIL_PATTERN, r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(email)
}

/// Validate a hex digest of any supported length (32 to 128 characters)
pub fn is_valid_hash(hash: &str) -> bool {
    cached(&HASH_PATTERN, r"^[a-fA-F0-9]{32,128}$").is_match(hash)
}

/// Validate a port number
pub fn is_valid_port(port: u32) -> bool {
    (MIN_PORT..=MAX_PORT).contains(&port)
}

/// Check that an indicator's value is well formed for its type
///
/// Unknown indicator types never validate.
pub fn validate_ioc(ioc: &IndicatorOfCompromise) -> bool {
    match &ioc.ioc_type {
        IocType::Ip => is_valid_ip(&ioc.value),
        IocType::Domain => is_valid_domain(&ioc.value),
        IocType::Url => is_valid_url(&ioc.value),
        IocType::Hash => is_valid_hash(&ioc.value),
        IocType::Email => is_valid_email(&ioc.value),
        IocType::Unknown(_) => false,
    }
}

/// Validate an indicator and report why it fails
///
/// The format check matches [`validate_ioc`]; feed metadata problems are
/// reported as warnings only.
pub fn check_ioc(ioc: &IndicatorOfCompromise) -> ValidationResult {
    let mut result = ValidationResult::success();

    if let IocType::Unknown(kind) = &ioc.ioc_type {
        result.add_error(format!("Unknown indicator type: '{kind}'"));
    } else if !validate_ioc(ioc) {
        result.add_error(format!(
            "Value '{}' is not a valid {} indicator",
            ioc.value, ioc.ioc_type
        ));
    }

    if !(0.0..=100.0).contains(&ioc.confidence) {
        result.add_warning(format!(
            "Confidence {} is outside the 0-100 range",
            ioc.confidence
        ));
    }

    if ioc.source.trim().is_empty() {
        result.add_warning("Indicator has no source".to_string());
    }

    result
}

/// Validate a batch of indicators, prefixing messages with their position
pub fn check_iocs(iocs: &[IndicatorOfCompromise]) -> ValidationResult {
    let mut result = ValidationResult::success();

    for (index, ioc) in iocs.iter().enumerate() {
        let mut item = check_ioc(ioc);
        item.errors = item
            .errors
            .into_iter()
            .map(|e| format!("[{index}] {e}"))
            .collect();
        item.warnings = item
            .warnings
            .into_iter()
            .map(|w| format!("[{index}] {w}"))
            .collect();
        result.merge(item);
    }

    result
}
