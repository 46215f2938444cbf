//! `econ-snapshot` library crate.
//!
//! The binary (`econsnap`) is a thin wrapper around this library so that:
//!
//! - the assembly pipeline is testable without spawning processes or
//!   touching the network
//! - modules are reusable (e.g., embedding the extractors elsewhere)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod frame;
pub mod io;
pub mod metrics;
