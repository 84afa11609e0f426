//! Emits a handful of sample records through the process-wide logger

use anyhow::Context;
use clap::Parser;
use logwire::{CleanupGuard, LoggingConfig, Secret, Severity};
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Entry point for the logwire-demo CLI
#[derive(Parser)]
#[command(name = "logwire-demo")]
#[command(about = "Print sample records using the logwire bootstrap", long_about = None)]
struct Cli {
    /// Minimum severity to emit
    #[arg(short, long, value_enum, default_value_t = Severity::Debug)]
    level: Severity,
    /// Human-readable console output instead of JSON
    #[arg(short, long)]
    development: bool,
    /// TOML config file; takes precedence over the flags above
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoggingConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None if cli.development => LoggingConfig::development(cli.level),
        None => LoggingConfig::production(cli.level),
    };

    logwire::init_with_config(&config).context("failed to set up logging")?;
    let _cleanup = CleanupGuard::new();

    info!(name = "demo", vcpu = 8, "created vm at provider");
    warn!(error = "example error", "A warning occurred");
    debug!(
        username = "ram",
        password = %Secret::new("admin"),
        "read userinfo from db"
    );
    let err = io::Error::other("volume is busy");
    error!(error = %err, vm = "demo", "failed to attach volume at vm");

    Ok(())
}
