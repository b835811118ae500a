//! Display formatting helpers
//!
//! Small, pure helpers that turn numbers, timestamps and identifiers into
//! the strings shown by the dashboards and the CLI.

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use std::sync::OnceLock;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();
static WORD_START_PATTERN: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hardcoded pattern must compile"))
}

/// Format large numbers with K/M/B suffixes
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Format a byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const SIZES: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let value = bytes as f64;
    let index = ((value.ln() / 1024f64.ln()).floor() as usize).min(SIZES.len() - 1);
    let scaled = (value / 1024f64.powi(index as i32) * 100.0).round() / 100.0;
    format!("{} {}", scaled, SIZES[index])
}

/// Format a duration in milliseconds using its two largest units
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

/// Zero-pad each IPv4 octet to three digits for column alignment
///
/// Anything without a dot is returned unchanged.
pub fn format_ip_address(ip: &str) -> String {
    if !ip.contains('.') {
        return ip.to_string();
    }

    ip.split('.')
        .map(|octet| format!("{octet:0>3}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Truncate text to `max_length` characters, ending in `...`
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Capitalize the first letter of each word and lowercase the rest
pub fn title_case(text: &str) -> String {
    cached(&WORD_PATTERN, r"\w\S*")
        .replace_all(text, |caps: &Captures| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .into_owned()
}

/// Convert `camelCase` to `Camel Case`
pub fn camel_to_title(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    capitalize_first(&spaced).trim().to_string()
}

/// Format a percentage with a fixed number of decimals
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Format an amount of money as `$1,234.56`
///
/// `USD`, `EUR` and `GBP` use their symbols; other codes are prefixed.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let symbol = match currency {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{other} "),
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol}{whole}.{:02}", cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Shorten a hash to `max_length` characters with an ellipsis in the middle
pub fn format_hash(hash: &str, max_length: usize) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= max_length {
        return hash.to_string();
    }

    let visible = max_length.saturating_sub(3);
    let start = visible / 2;
    let end = chars.len() - (visible - start);
    let head: String = chars[..start].iter().collect();
    let tail: String = chars[end..].iter().collect();
    format!("{head}...{tail}")
}

/// Format a port with its service name, e.g. `443/HTTPS`
pub fn format_port(port: u16, service: Option<&str>) -> String {
    match service {
        Some(service) => format!("{port}/{service}"),
        None => port.to_string(),
    }
}

/// Capitalize a severity for display
pub fn format_severity(severity: &str) -> String {
    capitalize_first(severity)
}

/// `policy_violation` becomes `Policy Violation`
pub fn format_threat_type(threat_type: &str) -> String {
    let spaced = threat_type.replace('_', " ");
    cached(&WORD_START_PATTERN, r"\b\w")
        .replace_all(&spaced, |caps: &Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Append a prefix length when one is given
pub fn format_network_address(address: &str, mask: Option<u8>) -> String {
    match mask {
        Some(mask) => format!("{address}/{mask}"),
        None => address.to_string(),
    }
}

/// Output style for [`format_date`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Jan 5, 2024`
    #[default]
    Short,
    /// `January 5, 2024 at 03:04 PM`
    Long,
    /// `03:04:05 PM`
    Time,
}

pub fn format_date(date: &DateTime<Utc>, format: DateFormat) -> String {
    match format {
        DateFormat::Short => date.format("%b %-d, %Y").to_string(),
        DateFormat::Long => date.format("%B %-d, %Y at %I:%M %p").to_string(),
        DateFormat::Time => date.format("%I:%M:%S %p").to_string(),
    }
}

/// Describe how long ago `timestamp` was relative to `now`
///
/// Anything a week or older is shown as a calendar date.
pub fn format_relative_time(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(*timestamp);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else if days < 7 {
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Parse an RFC 3339 timestamp and describe it relative to the current time
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => format_relative_time(&parsed.with_timezone(&Utc), &Utc::now()),
        Err(_) => "Invalid date".to_string(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_247.0), "1.2K");
        assert_eq!(format_number(2_500_000.0), "2.5M");
        assert_eq!(format_number(3_000_000_000.0), "3.0B");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(7_000), "7s");
        assert_eq!(format_duration(65_000), "1m 5s");
        assert_eq!(format_duration(3_660_000), "1h 1m");
        assert_eq!(format_duration(90_000_000), "1d 1h");
    }

    #[test]
    fn test_format_ip_address() {
        assert_eq!(format_ip_address("10.0.12.1"), "010.000.012.001");
        assert_eq!(format_ip_address("fe80:0:0:0:0:0:0:1"), "fe80:0:0:0:0:0:0:1");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
        assert_eq!(truncate_text("hello", 2), "...");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hello WORLD"), "Hello World");
        assert_eq!(title_case("port-scan detected"), "Port-scan Detected");
    }

    #[test]
    fn test_camel_to_title() {
        assert_eq!(camel_to_title("lastSeen"), "Last Seen");
        assert_eq!(camel_to_title("ThreatCount"), "Threat Count");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(67.26, 1), "67.3%");
        assert_eq!(format_percentage(45.0, 0), "45%");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_currency(0.99, "USD"), "$0.99");
        assert_eq!(format_currency(-9.99, "USD"), "-$9.99");
        assert_eq!(format_currency(1_000_000.0, "EUR"), "€1,000,000.00");
        assert_eq!(format_currency(5.0, "JPY"), "JPY 5.00");
    }

    #[test]
    fn test_format_hash() {
        let hash = "54e6c224000000000000000000000000";
        assert_eq!(format_hash(hash, 16), "54e6c2...0000000");
        assert_eq!(format_hash("short", 16), "short");
    }

    #[test]
    fn test_format_port() {
        assert_eq!(format_port(443, Some("HTTPS")), "443/HTTPS");
        assert_eq!(format_port(8080, None), "8080");
    }

    #[test]
    fn test_format_severity_and_threat_type() {
        assert_eq!(format_severity("critical"), "Critical");
        assert_eq!(format_threat_type("policy_violation"), "Policy Violation");
        assert_eq!(format_threat_type("apt"), "Apt");
    }

    #[test]
    fn test_format_network_address() {
        assert_eq!(format_network_address("10.0.0.0", Some(8)), "10.0.0.0/8");
        assert_eq!(format_network_address("10.0.0.1", None), "10.0.0.1");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 15, 4, 5).unwrap();
        assert_eq!(format_date(&date, DateFormat::Short), "Jan 5, 2024");
        assert_eq!(
            format_date(&date, DateFormat::Long),
            "January 5, 2024 at 03:04 PM"
        );
        assert_eq!(format_date(&date, DateFormat::Time), "03:04:05 PM");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(&now, &now), "Just now");
        assert_eq!(
            format_relative_time(&(now - Duration::minutes(5)), &now),
            "5 min ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::hours(1)), &now),
            "1 hour ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::hours(3)), &now),
            "3 hours ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(2)), &now),
            "2 days ago"
        );
        assert_eq!(
            format_relative_time(&(now - Duration::days(30)), &now),
            "2024-05-02"
        );
    }

    #[test]
    fn test_format_timestamp_invalid() {
        assert_eq!(format_timestamp("yesterday"), "Invalid date");
    }
}
