//! Utility modules for CyberForge
//!
//! This module provides the pure helper functions used throughout the
//! CyberForge shared library: validation, password scoring, mock hashing,
//! mock encryption and display formatting.

pub mod encryption;
pub mod formatting;
pub mod hashing;
pub mod password;
pub mod validation;

// Re-export commonly used items for convenience
pub use encryption::{mock_decrypt, mock_encrypt, try_mock_decrypt, DecryptError};
pub use formatting::{
    camel_to_title, format_bytes, format_currency, format_date, format_duration, format_hash,
    format_ip_address, format_network_address, format_number, format_percentage, format_port,
    format_relative_time, format_severity, format_threat_type, format_timestamp, title_case,
    truncate_text, DateFormat,
};
pub use hashing::{generate_hashes, mock_hash, HashAlgorithm, MockHash};
pub use password::{
    generate_secure_id, CharacterSets, PasswordAnalyzer, PasswordAssessment, PasswordGenerator,
    PasswordStrength,
};
pub use string_utils::sanitize_input;
pub use validation::{
    check_ioc, check_iocs, is_valid_domain, is_valid_email, is_valid_hash, is_valid_ip,
    is_valid_port, is_valid_url, validate_ioc, ValidationResult,
};

/// Utility functions for working with strings
pub mod string_utils {
    /// Escape HTML-significant characters in user input
    ///
    /// `&` is replaced first so existing entities are escaped too.
    pub fn sanitize_input(input: &str) -> String {
        let mut escaped = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                '/' => escaped.push_str("&#x2F;"),
                other => escaped.push(other),
            }
        }
        escaped
    }

    /// Sanitize a string by removing control characters
    pub fn sanitize_string(s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_control() || *c == '\t' || *c == '\n')
            .collect()
    }

}
