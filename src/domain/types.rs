//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be assembled in-memory and written straight to the snapshot JSON document
//! without a separate presentation layer.

use std::collections::BTreeMap;

use serde::Serialize;

/// A dense, chronologically ordered time series.
///
/// `x` holds period tokens (e.g. `"2024Q1"` or `"2024M03"`) and `y` the
/// matching observations. Both vectors always have the same length; missing
/// observations are dropped during extraction, never carried as placeholders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Final `(period, value)` pair, if any observations exist.
    pub fn last_pair(&self) -> Option<(&str, f64)> {
        match (self.x.last(), self.y.last()) {
            (Some(t), Some(v)) => Some((t.as_str(), *v)),
            _ => None,
        }
    }
}

/// A time series that keeps gaps in place.
///
/// Used for derived metrics (where early periods have insufficient history)
/// and for the euro-area comparator (whose wire format marks missing months
/// by omitting the positional index).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseSeries {
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

impl SparseSeries {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// One named entry in the snapshot.
///
/// The variants mirror the concrete document shapes the indicators produce;
/// serialization is untagged so each record appears as a plain object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorRecord {
    /// A series plus its latest observation (unemployment).
    Rate {
        x: Vec<String>,
        y: Vec<f64>,
        latest: f64,
        latest_date: String,
    },
    /// An annual series plus its latest year/value (GNI*).
    Annual {
        x: Vec<String>,
        y: Vec<f64>,
        latest_year: String,
        latest_value: f64,
    },
    /// A derived growth series; early periods and bad denominators are null.
    Growth {
        x: Vec<String>,
        y: Vec<Option<f64>>,
        latest_period: String,
        latest_yoy: Option<f64>,
    },
    /// A bare series with no scalar summaries.
    Plain { x: Vec<String>, y: Vec<f64> },
    /// Housing activity: completions and permissions under one record.
    Housing {
        completions: Series,
        permissions: Series,
    },
    /// Inflation: the domestic series next to the euro-area comparator.
    Inflation {
        ireland: Series,
        ea19: SparseSeries,
    },
    /// Monthly exchequer receipts from the best-effort CSV export.
    Receipts {
        x: Vec<String>,
        total: Vec<f64>,
        latest_total_month: String,
        latest_total_value: f64,
    },
}

/// The top-level snapshot document.
///
/// Created fresh each run and immutable once serialized; indicators that
/// failed are simply absent (no placeholder entries).
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Generation timestamp, UTC, ISO-8601.
    pub generated_at: String,
    pub series: BTreeMap<String, IndicatorRecord>,
}
