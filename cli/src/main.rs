//! CyberForge command line tool
//!
//! Thin front end over `cyberforge-shared`: every subcommand parses its
//! arguments, calls into the library and prints the result to stdout. Logs go
//! to stderr so output can be piped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};

use cyberforge_shared::config::paths;
use cyberforge_shared::core::simulation::DEFAULT_TARGET;
use cyberforge_shared::logging;
use cyberforge_shared::AppConfig;

mod commands;

use commands::cart::CartCommand;
use commands::tools::{PasswordCommand, ValidateKind};

#[derive(Parser)]
#[command(name = "cyberforge", author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a value is well formed for an indicator type
    Validate {
        #[arg(value_enum)]
        kind: ValidateKind,
        value: String,
    },

    /// Score or generate passwords
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Mock digest of the input (not cryptographic)
    Hash {
        input: String,
        /// MD5, SHA-1, SHA-256 or SHA-512; all four when omitted
        #[arg(short, long)]
        algorithm: Option<String>,
    },

    /// Expand a port spec such as 22,80-82
    Ports {
        /// Defaults to the configured port range
        spec: Option<String>,
        /// Fail on malformed tokens instead of dropping them
        #[arg(long)]
        strict: bool,
    },

    /// Classify an IPv4 address as private or public
    PrivateIp { ip: String },

    /// Mock-encrypt text with a key (base64, not encryption)
    Encrypt { text: String, key: String },

    /// Reverse `encrypt`
    Decrypt { data: String, key: String },

    /// Run the simulated network scan
    Scan {
        /// Target hosts, e.g. 192.168.1.1-254
        #[arg(short, long, default_value = DEFAULT_TARGET)]
        range: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show simulated dashboard gauges
    Dashboard {
        /// Number of refreshes before exiting
        #[arg(short, long, default_value_t = 5)]
        ticks: u32,
    },

    /// Manage the persisted cart and wishlist
    #[command(subcommand)]
    Cart(CartCommand),
}

fn config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => paths::default_config_file().context("Could not locate a config file"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // The config file decides the log level, so report load problems after init
    let config_path = config_path(args.config)?;
    let loaded = AppConfig::load(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    logging::init_logging(&config.logging.to_logging_config().with_debug(args.debug));

    match &loaded {
        Ok(_) => debug!("Configuration loaded from {:?}", config_path),
        Err(e) => warn!(
            "Failed to load config from {:?}: {}. Using defaults.",
            config_path, e
        ),
    }

    debug!("Starting CyberForge v{}", env!("CARGO_PKG_VERSION"));

    let ok = match args.command {
        Command::Validate { kind, value } => commands::tools::validate(kind, &value),
        Command::Password(command) => commands::tools::password(command),
        Command::Hash { input, algorithm } => commands::tools::hash(&input, algorithm.as_deref())?,
        Command::Ports { spec, strict } => commands::tools::ports(&config, spec.as_deref(), strict)?,
        Command::PrivateIp { ip } => commands::tools::private_ip(&ip),
        Command::Encrypt { text, key } => commands::tools::encrypt(&text, &key),
        Command::Decrypt { data, key } => commands::tools::decrypt(&data, &key),
        Command::Scan { range, json } => commands::simulate::scan(&config, &range, json).await?,
        Command::Dashboard { ticks } => commands::simulate::dashboard(&config, ticks).await?,
        Command::Cart(command) => commands::cart::run(&config, command)?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
