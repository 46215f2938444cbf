//! Series extraction: from a sliced table to an ordered `(time, value)` pair
//! of sequences.
//!
//! Row order is preserved as-is; the caller is responsible for supplying a
//! table that is already chronological (cube adapters emit time categories in
//! their declared order). No sorting happens here.

use crate::domain::Series;
use crate::error::SnapError;
use crate::frame::{Cell, Table};

/// Extract the two named columns into a series, dropping any row where
/// either cell is null. A non-null value cell that cannot be read as a
/// number is a `ValueConversion` error. The result may be empty.
pub fn extract(table: &Table, time_col: usize, value_col: usize) -> Result<Series, SnapError> {
    let mut x = Vec::new();
    let mut y = Vec::new();

    for row in table.rows() {
        let Some(t) = row[time_col].label() else {
            continue;
        };
        match coerce(&row[value_col]) {
            Coerced::Value(v) => {
                x.push(t);
                y.push(v);
            }
            Coerced::Missing => {}
            Coerced::Bad(raw) => {
                return Err(SnapError::ValueConversion {
                    column: table.columns()[value_col].clone(),
                    value: raw,
                });
            }
        }
    }

    Ok(Series { x, y })
}

/// The final surviving `(time, value)` pair after the same null-drop as
/// [`extract`]. Fails with `EmptySeries` when no row survives.
pub fn latest(table: &Table, time_col: usize, value_col: usize) -> Result<(String, f64), SnapError> {
    let series = extract(table, time_col, value_col)?;
    match series.last_pair() {
        Some((t, v)) => Ok((t.to_string(), v)),
        None => Err(SnapError::EmptySeries),
    }
}

enum Coerced {
    Value(f64),
    Missing,
    Bad(String),
}

fn coerce(cell: &Cell) -> Coerced {
    match cell {
        Cell::Number(v) => Coerced::Value(*v),
        Cell::Null => Coerced::Missing,
        Cell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) => Coerced::Value(v),
            Err(_) => Coerced::Bad(s.clone()),
        },
    }
}
