//! Command-line parsing.
//!
//! The surface is deliberately small: one optional positional argument for
//! the output path. Invocation frequency, scheduling, and retention of old
//! snapshots are external concerns.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "econsnap",
    version,
    about = "Assemble a point-in-time snapshot of Irish economic indicators"
)]
pub struct Cli {
    /// Output path for the snapshot JSON document.
    #[arg(default_value = "data/snapshot.json")]
    pub out_path: PathBuf,
}
