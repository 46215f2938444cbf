//! Provider clients.
//!
//! - `pxstat`: CSO PxStat JSON-stat cubes, flattened to a generic `Table`
//! - `ecb`: the euro-area inflation comparator (SDMX-JSON, positional)
//! - `exchequer`: the best-effort Department of Finance receipts CSV
//!
//! Each client exposes a small trait so the assembler can be exercised with
//! stub sources in tests.

use std::time::Duration;

pub mod ecb;
pub mod exchequer;
pub mod pxstat;

pub use ecb::*;
pub use exchequer::*;
pub use pxstat::*;

/// Every external fetch is a single blocking call bound by this timeout.
/// There are no retries beyond the receipts resolver's URL list.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(60);
