//! Runs every driver once and prints the combined report as JSON.
//!
//! ```bash
//! cargo run --example coordination_demo --features demo
//! cargo run --example coordination_demo --features demo -- config.json
//! RUST_LOG=tether=debug cargo run --example coordination_demo --features demo
//! ```

use std::{env, fs};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use tether::driver::run_all;
use tether::DriverConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tether=info")))
        .with_thread_names(true)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
            DriverConfig::from_json_str(&json).with_context(|| format!("invalid configuration in {path}"))?
        }
        None => DriverConfig::default(),
    };

    let report = run_all(&config).context("coordination run failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.counter.serializable || report.counter.final_value != report.counter.expected {
        bail!("shared counter lost updates");
    }
    if !(report.buffer.exactly_once && report.buffer.fifo) {
        bail!("bounded buffer broke delivery guarantees");
    }
    if !(report.channel.exactly_once && report.channel.fifo) {
        bail!("channel broke delivery guarantees");
    }
    Ok(())
}
