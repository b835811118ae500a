//! IPv4 address classification and scan target ranges

use regex::RegexSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

use crate::constants::PRIVATE_IP_RANGES;

static PRIVATE_PREFIXES: OnceLock<RegexSet> = OnceLock::new();

/// Prefix patterns, in the same order as `PRIVATE_IP_RANGES`
#[allow(clippy::expect_used)]
fn private_prefixes() -> &'static RegexSet {
    PRIVATE_PREFIXES.get_or_init(|| {
        RegexSet::new([
            r"^10\.",
            r"^172\.(1[6-9]|2[0-9]|3[01])\.",
            r"^192\.168\.",
            r"^127\.",
            r"^169\.254\.",
        ])
        .expect("private prefix patterns are valid")
    })
}

/// Whether `ip` starts with a private, loopback or link-local prefix
///
/// This is a textual prefix test: the rest of the address is not validated,
/// so `10.999.1.1` still counts as private. Pair it with
/// [`is_valid_ip`](crate::utils::validation::is_valid_ip) when the input is
/// untrusted.
pub fn is_private_ipv4(ip: &str) -> bool {
    private_prefixes().is_match(ip)
}

/// The reserved block an address falls in, e.g. `"192.168.0.0/16"`
pub fn private_range_for(ip: &str) -> Option<&'static str> {
    private_prefixes()
        .matches(ip)
        .iter()
        .next()
        .and_then(|index| PRIVATE_IP_RANGES.get(index).copied())
}

/// Inclusive range of IPv4 hosts, written `192.168.1.1-254`,
/// `10.0.0.1-10.0.0.20` or as a single address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Range {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Option<Self> {
        (u32::from(start) <= u32::from(end)).then_some(Self { start, end })
    }

    /// Parse a target; returns `None` for anything malformed or reversed
    pub fn parse(target: &str) -> Option<Self> {
        let target = target.trim();
        let Some((first, last)) = target.split_once('-') else {
            let addr: Ipv4Addr = target.parse().ok()?;
            return Self::new(addr, addr);
        };

        let start: Ipv4Addr = first.trim().parse().ok()?;
        let last = last.trim();
        let end = if last.contains('.') {
            last.parse().ok()?
        } else {
            let octet: u8 = last.parse().ok()?;
            let [a, b, c, _] = start.octets();
            Ipv4Addr::new(a, b, c, octet)
        };

        Self::new(start, end)
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Number of hosts covered
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.end)) - u64::from(u32::from(self.start)) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        (u32::from(self.start)..=u32::from(self.end)).contains(&u32::from(addr))
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> {
        (u32::from(self.start)..=u32::from(self.end)).map(Ipv4Addr::from)
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
