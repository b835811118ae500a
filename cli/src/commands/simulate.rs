//! Simulated scan and dashboard commands
//!
//! Both run their simulation on a [`PeriodicTask`] at the configured
//! interval; nothing here touches the network.

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use tracing::info;

use cyberforge_shared::core::ScanStatus;
use cyberforge_shared::{
    format_percentage, format_port, AppConfig, MetricsSimulation, PeriodicTask, ScanSimulation,
};

pub async fn scan(config: &AppConfig, range: &str, json: bool) -> Result<bool> {
    let simulation = Arc::new(Mutex::new(ScanSimulation::for_target(
        range,
        config.scanner.host_total,
    )));
    let scan_id = simulation
        .lock()
        .map_err(|_| anyhow!("Scan state poisoned"))?
        .start();

    let driver = Arc::clone(&simulation);
    let mut rng = StdRng::from_entropy();
    let mut task = PeriodicTask::spawn(config.scanner.progress_interval(), move || {
        let Ok(mut scan) = driver.lock() else {
            return ControlFlow::Break(());
        };
        let status = scan.advance(&mut rng);
        if !json {
            let progress = scan.progress();
            eprint!(
                "\rScanning {}: {}/{} ({})",
                scan.target(),
                progress.current.min(progress.total),
                progress.total,
                format_percentage(progress.percent(), 0)
            );
            let _ = std::io::stderr().flush();
        }

        match status {
            ScanStatus::Completed => ControlFlow::Break(()),
            ScanStatus::Idle | ScanStatus::Scanning => ControlFlow::Continue(()),
        }
    });

    let ticks = task.join().await.context("Scan task failed")?;
    if !json {
        eprintln!();
    }
    info!("Scan {} finished after {} ticks", scan_id, ticks);

    let scan = simulation
        .lock()
        .map_err(|_| anyhow!("Scan state poisoned"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(scan.results())?);
        return Ok(true);
    }

    println!("Scan {scan_id}: {} host(s) up", scan.results().len());
    for host in scan.results() {
        println!("{:<15} {:<16} {}", host.ip, host.hostname, host.os);
        for port in &host.ports {
            println!(
                "    {:<16} {:?}",
                format_port(port.port, Some(port.service.as_str())),
                port.status
            );
        }
    }
    Ok(true)
}

pub async fn dashboard(config: &AppConfig, ticks: u32) -> Result<bool> {
    let initial = MetricsSimulation::new();
    print_gauges(&initial);
    if ticks == 0 {
        return Ok(true);
    }

    let driver = Arc::new(Mutex::new(initial));
    let mut rng = StdRng::from_entropy();
    let mut remaining = ticks;
    let mut task = PeriodicTask::spawn(config.dashboard.refresh_interval(), move || {
        let Ok(mut metrics) = driver.lock() else {
            return ControlFlow::Break(());
        };
        metrics.tick(&mut rng);
        print_gauges(&metrics);

        remaining -= 1;
        if remaining == 0 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    task.join().await.context("Dashboard task failed")?;
    Ok(true)
}

fn print_gauges(metrics: &MetricsSimulation) {
    println!(
        "System load {:>6} | Network traffic {:>6}",
        format_percentage(metrics.system_load.value, 1),
        format_percentage(metrics.network_traffic.value, 1)
    );
}
