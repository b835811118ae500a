//! Security Utilities Integration Test
//!
//! Exercises the public API the way a caller would: through the crate root
//! re-exports, combining validators, scoring, hashing and port parsing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cyberforge_shared::core::ScanStatus;
use cyberforge_shared::{
    check_iocs, generate_hashes, is_private_ipv4, mock_hash, parse_port_range,
    parse_port_range_with, validate_ioc, IndicatorOfCompromise, ParseMode, PasswordAnalyzer,
    PasswordGenerator, PeriodicTask, ScanSimulation,
};

#[test]
fn test_password_score_never_decreases_when_criteria_added() {
    let steps = [
        "",
        "abcdefgh",
        "abcdefghijkl",
        "Abcdefghijkl",
        "Abcdefghijk1",
        "Abcdefghij1!",
    ];

    let mut previous = 0;
    for password in steps {
        let assessment = PasswordAnalyzer::assess(password);
        assert!(assessment.score <= 100);
        assert!(
            assessment.score >= previous,
            "{password:?} scored {} after {previous}",
            assessment.score
        );
        previous = assessment.score;
    }
    assert_eq!(previous, 100);
}

#[test]
fn test_generated_passwords_score_well() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let password = PasswordGenerator::generate_with(&mut rng);
        assert_eq!(password.chars().count(), 16);
        // Length criteria are always met by a 16 character password
        assert!(PasswordAnalyzer::assess(&password).score >= 30);
    }
}

#[test]
fn test_ioc_validation() {
    let iocs = vec![
        IndicatorOfCompromise::new("ip", "10.0.0.1", 90.0, "firewall"),
        IndicatorOfCompromise::new("ip", "999.0.0.1", 50.0, "feed"),
        IndicatorOfCompromise::new("bogus", "x", 10.0, "feed"),
    ];

    assert!(validate_ioc(&iocs[0]));
    assert!(!validate_ioc(&iocs[1]));
    assert!(!validate_ioc(&iocs[2]));

    let result = check_iocs(&iocs);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_private_ip_boundaries() {
    assert!(is_private_ipv4("172.31.0.5"));
    assert!(!is_private_ipv4("172.32.0.5"));
}

#[test]
fn test_mock_hashes_are_digest_shaped() {
    let first = mock_hash("abc", "MD5");
    assert_eq!(first, mock_hash("abc", "MD5"));
    assert_eq!(first.len(), 32);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let lengths: Vec<usize> = generate_hashes("abc").iter().map(|h| h.value.len()).collect();
    assert_eq!(lengths, vec![32, 40, 64, 128]);
}

#[test]
fn test_port_parsing_properties() {
    assert_eq!(parse_port_range("22,80-82,99999").to_vec(), vec![22, 80, 81, 82]);
    assert!(parse_port_range("").is_empty());

    for spec in ["1-1000", "443,22,22,8080-8085", "5,4,3,2,1", "65535,1"] {
        let ports = parse_port_range(spec);
        assert_eq!(parse_port_range(&ports.to_string()), ports);
        assert_eq!(
            parse_port_range_with(&ports.to_string(), ParseMode::Strict).unwrap(),
            ports
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_scan_simulation_on_periodic_task() {
    let scan = Arc::new(Mutex::new(ScanSimulation::for_target("192.168.1.1-254", 254)));
    scan.lock().unwrap().start();

    let driver = Arc::clone(&scan);
    let mut rng = StdRng::seed_from_u64(11);
    let mut task = PeriodicTask::spawn(Duration::from_millis(100), move || {
        let mut scan = driver.lock().unwrap();
        match scan.advance(&mut rng) {
            ScanStatus::Completed => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });

    let ticks = task.join().await.unwrap();
    let scan = scan.lock().unwrap();
    assert!(scan.is_complete());
    assert_eq!(scan.results().len(), 3);
    // Progress ticks plus the completing tick
    assert!(ticks >= 52);
}
