//! Stateless utility commands

use anyhow::{anyhow, Context, Result};
use clap::{Subcommand, ValueEnum};

use cyberforge_shared::network::{private_range_for, service_name};
use cyberforge_shared::{
    check_ioc, format_port, generate_hashes, is_valid_ip, is_valid_port, mock_encrypt,
    parse_port_range_with, try_mock_decrypt, AppConfig, HashAlgorithm, IndicatorOfCompromise,
    MockHash, ParseMode, PasswordAnalyzer, PasswordGenerator,
};

/// Most ports listed individually before output is summarized
const PORT_LISTING_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidateKind {
    Ip,
    Domain,
    Url,
    Email,
    Hash,
    Port,
}

#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Score a password from 0 to 100
    Score { password: String },

    /// Generate random 16 character passwords
    Generate {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
}

impl ValidateKind {
    /// Indicator type checked for this kind; ports are not indicators
    fn ioc_type(self) -> Option<&'static str> {
        match self {
            ValidateKind::Ip => Some("ip"),
            ValidateKind::Domain => Some("domain"),
            ValidateKind::Url => Some("url"),
            ValidateKind::Email => Some("email"),
            ValidateKind::Hash => Some("hash"),
            ValidateKind::Port => None,
        }
    }
}

pub fn validate(kind: ValidateKind, value: &str) -> bool {
    let Some(ioc_type) = kind.ioc_type() else {
        let valid = value.trim().parse::<u32>().map_or(false, is_valid_port);
        println!("{}", if valid { "valid" } else { "invalid" });
        return valid;
    };

    let result = check_ioc(&IndicatorOfCompromise::new(ioc_type, value, 100.0, "cli"));
    if result.is_valid {
        println!("valid");
    } else {
        println!("invalid");
        for error in &result.errors {
            println!("  {error}");
        }
    }
    result.is_valid
}

pub fn password(command: PasswordCommand) -> bool {
    match command {
        PasswordCommand::Score { password } => {
            let assessment = PasswordAnalyzer::assess(&password);
            println!("Score: {}/100 ({})", assessment.score, assessment.strength());
            for advice in &assessment.feedback {
                println!("  - {advice}");
            }
            true
        }
        PasswordCommand::Generate { count } => {
            for _ in 0..count.max(1) {
                println!("{}", PasswordGenerator::generate());
            }
            true
        }
    }
}

pub fn hash(input: &str, algorithm: Option<&str>) -> Result<bool> {
    let hashes = match algorithm {
        Some(name) => {
            let algorithm: HashAlgorithm = name.parse().map_err(|e: String| anyhow!(e))?;
            vec![MockHash::compute(input, algorithm)]
        }
        None => generate_hashes(input),
    };

    if hashes.is_empty() {
        println!("Nothing to hash");
        return Ok(false);
    }

    for hash in hashes {
        println!("{:<8} {}", hash.algorithm.name(), hash.value);
    }
    Ok(true)
}

pub fn ports(config: &AppConfig, spec: Option<&str>, strict: bool) -> Result<bool> {
    let spec = spec.unwrap_or(config.scanner.default_port_range.as_str());
    let mode = if strict {
        ParseMode::Strict
    } else {
        config.scanner.parse_mode()
    };

    let ports = parse_port_range_with(spec, mode)
        .with_context(|| format!("Invalid port spec '{spec}'"))?;

    println!("{} port(s): {}", ports.len(), ports.to_compact_string());
    if ports.len() <= PORT_LISTING_LIMIT {
        for port in ports.iter() {
            println!("  {}", format_port(port, service_name(port)));
        }
    } else {
        let known: Vec<String> = ports
            .iter()
            .filter_map(|port| service_name(port).map(|name| format_port(port, Some(name))))
            .collect();
        if !known.is_empty() {
            println!("Well-known: {}", known.join(", "));
        }
    }
    Ok(!ports.is_empty())
}

pub fn private_ip(ip: &str) -> bool {
    if !is_valid_ip(ip) {
        tracing::warn!("'{}' is not a valid IP address; checking prefix only", ip);
    }

    match private_range_for(ip) {
        Some(range) => {
            println!("private ({range})");
            true
        }
        None => {
            println!("public");
            false
        }
    }
}

pub fn encrypt(text: &str, key: &str) -> bool {
    match mock_encrypt(text, key) {
        Some(data) => {
            println!("{data}");
            true
        }
        None => {
            eprintln!("Both text and key are required");
            false
        }
    }
}

pub fn decrypt(data: &str, key: &str) -> bool {
    match try_mock_decrypt(data, key) {
        Ok(text) => {
            println!("{text}");
            true
        }
        Err(e) => {
            eprintln!("{e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberforge_shared::constants::DECRYPTION_FAILED_MESSAGE;

    #[test]
    fn test_validate_kinds() {
        assert!(validate(ValidateKind::Ip, "10.0.0.1"));
        assert!(!validate(ValidateKind::Ip, "999.0.0.1"));
        assert!(validate(ValidateKind::Email, "analyst@example.com"));
        assert!(validate(ValidateKind::Port, "443"));
        assert!(!validate(ValidateKind::Port, "0"));
        assert!(!validate(ValidateKind::Port, "http"));
    }

    #[test]
    fn test_hash_algorithm_selection() {
        assert!(hash("abc", Some("sha-256")).unwrap());
        assert!(hash("abc", None).unwrap());
        assert!(!hash("", None).unwrap());
        assert!(hash("abc", Some("crc32")).is_err());
    }

    #[test]
    fn test_ports_modes() {
        let config = AppConfig::default();
        assert!(ports(&config, Some("22,80-82"), false).unwrap());
        assert!(ports(&config, None, false).unwrap());
        assert!(ports(&config, Some("22,abc"), true).is_err());
        assert!(!ports(&config, Some("99999"), false).unwrap_or(false));
    }

    #[test]
    fn test_private_ip() {
        assert!(private_ip("192.168.1.10"));
        assert!(!private_ip("8.8.8.8"));
    }

    #[test]
    fn test_encrypt_decrypt() {
        assert!(encrypt("hello", "key"));
        assert!(!encrypt("", "key"));
        assert!(decrypt("aGVsbG9rZXk=", "key"));
        assert!(!decrypt("%%%", "key"));
        assert!(!decrypt("", "key"));

        // A message that reads like the failure text still decrypts
        let data = mock_encrypt(DECRYPTION_FAILED_MESSAGE, "key").unwrap();
        assert!(decrypt(&data, "key"));
    }
}
