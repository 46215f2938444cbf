//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - ordered time series (`Series`, `SparseSeries`)
//! - per-indicator output records (`IndicatorRecord`)
//! - the top-level snapshot document (`Snapshot`)

pub mod types;

pub use types::*;
