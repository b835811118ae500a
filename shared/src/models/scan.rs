//! Network scan result types

use serde::{Deserialize, Serialize};

/// Reachability of a scanned host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Online,
    Offline,
    Filtered,
}

/// State of a single port on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
    Filtered,
}

/// A port observed on a host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    pub port: u16,
    pub service: String,
    pub status: PortStatus,
}

impl PortInfo {
    pub fn new(port: u16, service: &str, status: PortStatus) -> Self {
        Self {
            port,
            service: service.to_string(),
            status,
        }
    }
}

/// Everything known about one host after a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub ip: String,
    pub hostname: String,
    pub status: HostStatus,
    pub ports: Vec<PortInfo>,
    pub os: String,
    pub last_seen: String,
}

impl ScanResult {
    /// Ports reported open on this host
    pub fn open_ports(&self) -> impl Iterator<Item = &PortInfo> {
        self.ports.iter().filter(|p| p.status == PortStatus::Open)
    }
}
