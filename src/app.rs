//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - constructs the provider clients
//! - runs the assembly pass and writes the snapshot
//!
//! Per-indicator failures never reach this level: the assembler logs and
//! skips them, so the process exits 0 whenever setup and the final write
//! succeed, regardless of how many indicators made it in.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::data::{EcbClient, ExchequerClient, PxStatClient};
use crate::error::SnapError;

pub mod pipeline;

/// Entry point for the `econsnap` binary.
pub fn run() -> Result<(), SnapError> {
    init_logging();
    let cli = Cli::parse();

    let cubes = PxStatClient::new()?;
    let comparator = EcbClient::new()?;
    let receipts = ExchequerClient::new()?;
    let sources = pipeline::Sources {
        cubes: &cubes,
        comparator: &comparator,
        receipts: &receipts,
    };

    let snapshot = pipeline::assemble(&sources);
    crate::io::write_snapshot(&cli.out_path, &snapshot)?;
    info!(
        path = %cli.out_path.display(),
        indicators = snapshot.series.len(),
        "snapshot written"
    );
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
