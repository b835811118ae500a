//! Port specification parsing
//!
//! A port spec is a comma separated list of single ports and inclusive
//! `start-end` ranges, e.g. `22,80-82,443`. The result is always a sorted
//! set with duplicates collapsed.

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::constants::{COMMON_PORTS, MAX_PORT};
use crate::utils::validation::is_valid_port;

/// How malformed tokens are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Drop malformed or out-of-range tokens silently
    Lenient,
    /// Fail on the first malformed or out-of-range token
    Strict,
}

impl Default for ParseMode {
    fn default() -> Self {
        if cfg!(feature = "strict-ports") {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }
}

/// Reasons a token is rejected in strict mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortRangeError {
    #[error("Invalid port token '{token}'")]
    InvalidToken { token: String },

    #[error("Port {value} in '{token}' is outside 1-65535")]
    OutOfRange { token: String, value: u64 },

    #[error("Range '{token}' starts after it ends")]
    ReversedRange { token: String },
}

/// Sorted, de-duplicated set of ports in 1-65535
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet {
    ports: BTreeSet<u16>,
}

impl PortSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, port: u16) -> bool {
        self.ports.insert(port)
    }

    /// Insert every port in `start..=end`
    pub fn insert_range(&mut self, start: u16, end: u16) {
        self.ports.extend(start..=end);
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Ports in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u16> {
        self.iter().collect()
    }

    /// Collapse consecutive ports into inclusive ranges
    pub fn ranges(&self) -> Vec<(u16, u16)> {
        let mut ranges: Vec<(u16, u16)> = Vec::new();
        for port in self.iter() {
            match ranges.last_mut() {
                Some((_, end)) if u32::from(*end) + 1 == u32::from(port) => *end = port,
                _ => ranges.push((port, port)),
            }
        }
        ranges
    }

    /// Compact spec form, e.g. `22,80-82`, which parses back to the same set
    pub fn to_compact_string(&self) -> String {
        self.ranges()
            .into_iter()
            .map(|(start, end)| {
                if start == end {
                    start.to_string()
                } else {
                    format!("{start}-{end}")
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Comma separated integers, e.g. `22,80,81,82`
impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for port in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{port}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<u16> for PortSet {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        Self {
            ports: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PortSet {
    type Item = u16;
    type IntoIter = std::collections::btree_set::IntoIter<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.into_iter()
    }
}

/// Parse a port spec, silently dropping anything malformed
///
/// Tokens that do not parse, fall outside 1-65535, or describe a reversed
/// range contribute nothing. An empty spec yields an empty set.
pub fn parse_port_range(spec: &str) -> PortSet {
    let mut ports = PortSet::new();
    let mut dropped = 0usize;

    for token in spec.split(',') {
        match lenient_token(token) {
            Some((start, end)) => ports.insert_range(start, end),
            None => dropped += 1,
        }
    }

    if dropped > 0 && !spec.trim().is_empty() {
        debug!("Dropped {} malformed port token(s) from '{}'", dropped, spec);
    }

    ports
}

/// Parse a port spec with an explicit policy for malformed tokens
pub fn parse_port_range_with(spec: &str, mode: ParseMode) -> Result<PortSet, PortRangeError> {
    match mode {
        ParseMode::Lenient => Ok(parse_port_range(spec)),
        ParseMode::Strict => {
            let mut ports = PortSet::new();
            if spec.trim().is_empty() {
                return Ok(ports);
            }

            for token in spec.split(',') {
                let (start, end) = strict_token(token)?;
                ports.insert_range(start, end);
            }
            Ok(ports)
        }
    }
}

/// Service usually found on a well-known port
pub fn service_name(port: u16) -> Option<&'static str> {
    COMMON_PORTS
        .binary_search_by_key(&port, |(p, _)| *p)
        .ok()
        .map(|index| COMMON_PORTS[index].1)
}

fn lenient_token(token: &str) -> Option<(u16, u16)> {
    if token.contains('-') {
        // Anything after a second dash is ignored
        let mut parts = token.split('-');
        let start = parts.next().and_then(leading_integer)?;
        let end = parts.next().and_then(leading_integer)?;
        let start = to_port(start)?;
        let end = to_port(end)?;
        (start <= end).then_some((start, end))
    } else {
        let port = to_port(leading_integer(token)?)?;
        Some((port, port))
    }
}

fn strict_token(token: &str) -> Result<(u16, u16), PortRangeError> {
    let invalid = || PortRangeError::InvalidToken {
        token: token.to_string(),
    };
    let checked = |value: u64| -> Result<u16, PortRangeError> {
        to_port(value).ok_or_else(|| PortRangeError::OutOfRange {
            token: token.to_string(),
            value,
        })
    };

    if token.contains('-') {
        let mut parts = token.split('-');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let start = checked(whole_integer(start).ok_or_else(invalid)?)?;
        let end = checked(whole_integer(end).ok_or_else(invalid)?)?;
        if start > end {
            return Err(PortRangeError::ReversedRange {
                token: token.to_string(),
            });
        }
        Ok((start, end))
    } else {
        let port = checked(whole_integer(token).ok_or_else(invalid)?)?;
        Ok((port, port))
    }
}

/// Leading decimal integer of a trimmed token, ignoring trailing junk
///
/// `"80abc"` reads as 80; a token with no leading digits does not parse.
/// Values too large for `u64` saturate and are then rejected as out of range.
fn leading_integer(text: &str) -> Option<u64> {
    let text = text.trim();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let digits = &text[..end];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// The whole trimmed token must be decimal digits
fn whole_integer(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(text.parse::<u64>().unwrap_or(u64::MAX))
}

fn to_port(value: u64) -> Option<u16> {
    u32::try_from(value)
        .ok()
        .filter(|v| is_valid_port(*v) && *v <= MAX_PORT)
        .and_then(|v| u16::try_from(v).ok())
}
