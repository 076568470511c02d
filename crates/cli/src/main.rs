// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lockstep` - keep a set of directory roots mirroring each other.
//!
//! The binary is thin plumbing: argument validation, log file setup, signal
//! wiring, and the top-level wait for shutdown. Everything interesting lives
//! in `lockstep-engine`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::EnvFilter;

use lockstep_core::Buffer;
use lockstep_engine::{seed, Supervisor};

/// Structured log records land here, truncated on every start.
const LOG_FILE: &str = "log.txt";

/// Mirror the union of file contents across a fixed set of directory roots.
///
/// Runs until SIGINT or SIGTERM, then drains every worker and exits.
#[derive(Parser)]
#[command(name = "lockstep", version)]
struct Cli {
    /// Interval between reconciliation passes, in milliseconds
    tick_ms: u64,

    /// Directory roots to keep in lockstep
    #[arg(num_args = 2.., required = true)]
    roots: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interval = validate(&cli)?;

    // Keep the guard alive so buffered log lines flush on exit.
    let _guard = init_logging()?;

    let buffer = Arc::new(Buffer::new());
    seed(&buffer, &cli.roots).context("initial scan failed")?;

    let supervisor = Supervisor::launch(buffer, &cli.roots, interval);
    println!("Synchronization started");

    wait_for_signal().await?;

    println!("Signal received, draining reconcilers...");
    supervisor.shutdown().await;
    println!("Synchronization stopped");
    Ok(())
}

/// Check the argument contract before anything touches the filesystem.
fn validate(cli: &Cli) -> Result<Duration> {
    if cli.tick_ms == 0 {
        bail!("tick interval must be a positive number of milliseconds");
    }
    for root in &cli.roots {
        let meta = std::fs::metadata(root)
            .with_context(|| format!("root {} is not accessible", root.display()))?;
        if !meta.is_dir() {
            bail!("root {} is not a directory", root.display());
        }
    }
    Ok(Duration::from_millis(cli.tick_ms))
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("failed to create {}", LOG_FILE))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

async fn wait_for_signal() -> Result<()> {
    let mut sigint =
        signal(SignalKind::interrupt()).context("failed to install SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
