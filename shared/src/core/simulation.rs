//! Simulated network scan and dashboard metrics
//!
//! Neither simulation touches the network. The scan counts hosts up at a
//! random pace and then reveals a fixed result set; the metrics drift
//! randomly inside fixed bounds. Both take the random source as an argument
//! so tests can drive them with a seeded generator.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{HostStatus, PortInfo, PortStatus, ScanResult};
use crate::network::Ipv4Range;

/// Hosts in a /24 minus network and broadcast addresses
pub const DEFAULT_HOST_TOTAL: u32 = 254;

/// Target shown before the user edits it
pub const DEFAULT_TARGET: &str = "192.168.1.1-254";

const MAX_HOSTS_PER_TICK: u32 = 5;

/// Lifecycle of a scan run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Idle,
    Scanning,
    Completed,
}

/// Hosts processed so far out of the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanProgress {
    pub current: u32,
    pub total: u32,
    pub status: ScanStatus,
}

impl ScanProgress {
    /// Completion in percent, capped at 100
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (f64::from(self.current) / f64::from(self.total) * 100.0).min(100.0)
    }
}

/// A mock scan of a host range
#[derive(Debug, Clone)]
pub struct ScanSimulation {
    scan_id: Option<Uuid>,
    target: String,
    total: u32,
    progress: ScanProgress,
    results: Vec<ScanResult>,
}

impl ScanSimulation {
    pub fn new<T: Into<String>>(target: T, total: u32) -> Self {
        Self {
            scan_id: None,
            target: target.into(),
            total,
            progress: ScanProgress {
                current: 0,
                total: 0,
                status: ScanStatus::Idle,
            },
            results: Vec::new(),
        }
    }

    /// Size the scan from the target range, or `fallback_total` if it does not parse
    pub fn for_target(target: &str, fallback_total: u32) -> Self {
        let total = Ipv4Range::parse(target)
            .and_then(|range| u32::try_from(range.len()).ok())
            .unwrap_or(fallback_total);
        Self::new(target, total)
    }

    /// Reset and begin a new run, returning its id
    pub fn start(&mut self) -> Uuid {
        let scan_id = Uuid::new_v4();
        self.scan_id = Some(scan_id);
        self.results.clear();
        self.progress = ScanProgress {
            current: 0,
            total: self.total,
            status: ScanStatus::Scanning,
        };
        info!("Scan {} started on {} ({} hosts)", scan_id, self.target, self.total);
        scan_id
    }

    /// Process one timer tick
    ///
    /// While scanning, adds 1 to 5 hosts. The first tick that finds the
    /// count at or past the total completes the scan and reveals the
    /// results, so the count may briefly overshoot the total.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ScanStatus {
        if self.progress.status != ScanStatus::Scanning {
            return self.progress.status;
        }

        if self.progress.current >= self.progress.total {
            self.progress.status = ScanStatus::Completed;
            self.results = discovered_hosts();
            info!(
                "Scan {} completed with {} hosts",
                self.scan_id.map(|id| id.to_string()).unwrap_or_default(),
                self.results.len()
            );
        } else {
            let step = rng.gen_range(1..=MAX_HOSTS_PER_TICK);
            self.progress.current = self.progress.current.saturating_add(step);
            debug!("Scan progress {}/{}", self.progress.current, self.progress.total);
        }

        self.progress.status
    }

    pub fn scan_id(&self) -> Option<Uuid> {
        self.scan_id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn progress(&self) -> ScanProgress {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress.status == ScanStatus::Completed
    }

    /// Hosts found; empty until the scan completes
    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }
}

impl Default for ScanSimulation {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET, DEFAULT_HOST_TOTAL)
    }
}

fn host(ip: &str, hostname: &str, ports: Vec<PortInfo>, os: &str, last_seen: &str) -> ScanResult {
    ScanResult {
        ip: ip.to_string(),
        hostname: hostname.to_string(),
        status: HostStatus::Online,
        ports,
        os: os.to_string(),
        last_seen: last_seen.to_string(),
    }
}

/// The fixed set every completed scan reports
fn discovered_hosts() -> Vec<ScanResult> {
    use PortStatus::{Filtered, Open};

    vec![
        host(
            "192.168.1.1",
            "router.local",
            vec![
                PortInfo::new(22, "SSH", Open),
                PortInfo::new(80, "HTTP", Open),
                PortInfo::new(443, "HTTPS", Open),
            ],
            "Linux 4.x",
            "2 min ago",
        ),
        host(
            "192.168.1.100",
            "workstation-01",
            vec![
                PortInfo::new(135, "RPC", Open),
                PortInfo::new(445, "SMB", Open),
                PortInfo::new(3389, "RDP", Filtered),
            ],
            "Windows 10",
            "1 min ago",
        ),
        host(
            "192.168.1.50",
            "server-db",
            vec![
                PortInfo::new(22, "SSH", Open),
                PortInfo::new(3306, "MySQL", Open),
                PortInfo::new(5432, "PostgreSQL", Open),
            ],
            "Ubuntu 20.04",
            "30 sec ago",
        ),
    ]
}

/// A value that drifts randomly inside `[min, max]`
///
/// Bounds given in the wrong order are swapped. A NaN bound or step never
/// panics; the value simply stays pinned to whichever bound is a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundedMetric {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Largest change per tick in either direction
    pub max_step: f64,
}

impl BoundedMetric {
    pub fn new(value: f64, min: f64, max: f64, max_step: f64) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self {
            value: bound(value, min, max),
            min,
            max,
            max_step,
        }
    }

    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let delta = (rng.gen::<f64>() - 0.5) * 2.0 * self.max_step;
        self.value = bound(self.value + delta, self.min, self.max);
        self.value
    }
}

// `f64::clamp` panics on NaN or reversed bounds; `max`/`min` skip NaN
fn bound(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Dashboard gauges for system load and network traffic
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSimulation {
    pub system_load: BoundedMetric,
    pub network_traffic: BoundedMetric,
}

impl MetricsSimulation {
    pub fn new() -> Self {
        Self {
            system_load: BoundedMetric::new(67.0, 20.0, 95.0, 5.0),
            network_traffic: BoundedMetric::new(45.0, 10.0, 90.0, 7.5),
        }
    }

    /// Perturb both gauges once
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.system_load.perturb(rng);
        self.network_traffic.perturb(rng);
        debug!(
            "Metrics: load {:.1}%, traffic {:.1}%",
            self.system_load.value, self.network_traffic.value
        );
    }
}

impl Default for MetricsSimulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bounded_metric_tolerates_bad_bounds() {
        let metric = BoundedMetric::new(50.0, 90.0, 10.0, 5.0);
        assert_eq!((metric.min, metric.max), (10.0, 90.0));
        assert_eq!(metric.value, 50.0);

        let mut rng = StdRng::seed_from_u64(3);
        let mut metric = BoundedMetric::new(50.0, f64::NAN, 60.0, 5.0);
        for _ in 0..20 {
            assert!(metric.perturb(&mut rng) <= 60.0);
        }

        let mut metric = BoundedMetric::new(50.0, 0.0, 100.0, 5.0);
        metric.min = 80.0;
        metric.max = 20.0;
        metric.perturb(&mut rng);
        assert!(!metric.value.is_nan());
    }

    fn run_to_completion(scan: &mut ScanSimulation, rng: &mut StdRng) -> usize {
        let mut ticks = 0;
        while scan.advance(rng) == ScanStatus::Scanning {
            ticks += 1;
            assert!(ticks < 10_000, "scan never completed");
        }
        ticks
    }

    #[test]
    fn test_idle_until_started() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scan = ScanSimulation::default();
        assert_eq!(scan.advance(&mut rng), ScanStatus::Idle);
        assert_eq!(scan.progress().current, 0);
        assert!(scan.scan_id().is_none());
    }

    #[test]
    fn test_scan_completes_with_fixed_hosts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scan = ScanSimulation::default();
        scan.start();
        assert_eq!(scan.progress().total, 254);
        assert!(scan.results().is_empty());

        let ticks = run_to_completion(&mut scan, &mut rng);
        // 254 hosts at 1-5 per tick
        assert!((51..=254).contains(&ticks));

        assert!(scan.is_complete());
        assert!(scan.progress().current >= 254);
        assert!(scan.progress().current < 254 + MAX_HOSTS_PER_TICK);
        assert_eq!(scan.progress().percent(), 100.0);

        let hostnames: Vec<&str> = scan.results().iter().map(|h| h.hostname.as_str()).collect();
        assert_eq!(hostnames, vec!["router.local", "workstation-01", "server-db"]);
    }

    #[test]
    fn test_progress_steps_are_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut scan = ScanSimulation::new("10.0.0.1-10", 10_000);
        scan.start();
        let mut previous = 0;
        for _ in 0..100 {
            scan.advance(&mut rng);
            let current = scan.progress().current;
            assert!((1..=5).contains(&(current - previous)));
            previous = current;
        }
    }

    #[test]
    fn test_completed_scan_ignores_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scan = ScanSimulation::new("192.168.1.1", 1);
        scan.start();
        run_to_completion(&mut scan, &mut rng);
        let progress = scan.progress();
        assert_eq!(scan.advance(&mut rng), ScanStatus::Completed);
        assert_eq!(scan.progress(), progress);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut scan = ScanSimulation::new("192.168.1.1-20", 20);
        let first = scan.start();
        run_to_completion(&mut scan, &mut rng);

        let second = scan.start();
        assert_ne!(first, second);
        assert_eq!(scan.progress().current, 0);
        assert_eq!(scan.progress().status, ScanStatus::Scanning);
        assert!(scan.results().is_empty());
    }

    #[test]
    fn test_total_from_target() {
        assert_eq!(ScanSimulation::for_target("192.168.1.1-254", 99).total, 254);
        assert_eq!(ScanSimulation::for_target("10.0.0.1-10.0.0.8", 99).total, 8);
        assert_eq!(ScanSimulation::for_target("example.com", 99).total, 99);
    }

    #[test]
    fn test_metrics_start_values() {
        let metrics = MetricsSimulation::new();
        assert_eq!(metrics.system_load.value, 67.0);
        assert_eq!(metrics.network_traffic.value, 45.0);
    }

    #[test]
    fn test_metrics_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut metrics = MetricsSimulation::new();
        let mut previous = metrics;

        for _ in 0..1_000 {
            metrics.tick(&mut rng);
            let load = metrics.system_load.value;
            let traffic = metrics.network_traffic.value;
            assert!((20.0..=95.0).contains(&load));
            assert!((10.0..=90.0).contains(&traffic));
            assert!((load - previous.system_load.value).abs() <= 5.0);
            assert!((traffic - previous.network_traffic.value).abs() <= 7.5);
            previous = metrics;
        }
    }
}
