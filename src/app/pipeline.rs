//! Snapshot assembly.
//!
//! One sequential pass over the indicators; each indicator is fetched and
//! processed to completion before the next begins. Every per-indicator
//! pipeline runs inside an isolation boundary: a failure is logged as a
//! warning and the indicator is simply absent from the document — no
//! placeholder entry is ever written.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, warn};

use crate::data::{ComparatorSource, CubeSource, ReceiptsSource, parse_receipts};
use crate::domain::{IndicatorRecord, Series, Snapshot, SparseSeries};
use crate::error::SnapError;
use crate::frame::{DimensionFilter, Table, extract, latest, slice};
use crate::metrics;

/// The external collaborators an assembly run draws from.
pub struct Sources<'a> {
    pub cubes: &'a dyn CubeSource,
    pub comparator: &'a dyn ComparatorSource,
    pub receipts: &'a dyn ReceiptsSource,
}

/// Assemble the snapshot. Never fails as a whole: indicators drop out
/// individually, and the document is stamped with the generation time at
/// the end of the pass.
pub fn assemble(sources: &Sources<'_>) -> Snapshot {
    let mut series = BTreeMap::new();

    record(&mut series, "unemployment_rate", unemployment(sources.cubes));
    record(&mut series, "gni_star", gni_star(sources.cubes));
    record(&mut series, "wage_growth", wage_growth(sources.cubes));
    record(&mut series, "mdd", domestic_demand(sources.cubes));
    record(&mut series, "current_account", current_account(sources.cubes));
    record(&mut series, "employment_rate", employment(sources.cubes));
    record(&mut series, "live_register", live_register(sources.cubes));
    record(&mut series, "housing", housing(sources.cubes));
    record(
        &mut series,
        "hicp",
        inflation(sources.cubes, sources.comparator),
    );
    record_receipts(&mut series, sources.receipts);

    Snapshot {
        generated_at: Utc::now().to_rfc3339(),
        series,
    }
}

/// The isolation boundary: success inserts under the canonical name,
/// failure logs and moves on.
fn record(
    series: &mut BTreeMap<String, IndicatorRecord>,
    name: &str,
    result: Result<IndicatorRecord, SnapError>,
) {
    match result {
        Ok(rec) => {
            series.insert(name.to_string(), rec);
        }
        Err(err) => warn!(indicator = name, error = %err, "indicator skipped"),
    }
}

fn unemployment(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let table = slice(
        &cubes.dataset("MUM01")?,
        &[
            DimensionFilter::new("sex", "All persons"),
            DimensionFilter::new("season", "Seasonally adjusted"),
            DimensionFilter::new("age", "15-74"),
            DimensionFilter::new("stat", "rate"),
        ],
    );
    let (tcol, vcol) = resolve_columns(&table, &["time"])?;
    let series = extract(&table, tcol, vcol)?;
    let (latest_date, latest_value) = latest(&table, tcol, vcol)?;
    Ok(IndicatorRecord::Rate {
        x: series.x,
        y: series.y,
        latest: latest_value,
        latest_date,
    })
}

fn gni_star(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    // The indicator dimension's name varies across vintages of this dataset
    // ("Indicator" vs "Statistic"); an inapplicable filter is a no-op, so
    // both are tried.
    let wanted = ["Modified gross national income", "gni"];
    let filters = [
        DimensionFilter::any_of("indicator", wanted),
        DimensionFilter::any_of("stat", wanted),
    ];
    let series = cube_series(cubes, "NA002", &filters, &["time", "year"])?;
    let (latest_year, latest_value) = series
        .last_pair()
        .map(|(t, v)| (t.to_string(), v))
        .ok_or(SnapError::EmptySeries)?;
    Ok(IndicatorRecord::Annual {
        x: series.x,
        y: series.y,
        latest_year,
        latest_value,
    })
}

fn wage_growth(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let filters = [
        DimensionFilter::new("earnings", "Average weekly earnings"),
        DimensionFilter::new("sector", "All"),
    ];
    let series = cube_series(cubes, "EHQ03", &filters, &["time"])?;
    let latest_period = series.x.last().cloned().ok_or(SnapError::EmptySeries)?;

    // Quarterly series, so lag 4 is one year back.
    let values: Vec<Option<f64>> = series.y.iter().copied().map(Some).collect();
    let growth = metrics::yoy(&values, 4);
    let latest_yoy = growth.last().copied().flatten();

    Ok(IndicatorRecord::Growth {
        x: series.x,
        y: growth,
        latest_period,
        latest_yoy,
    })
}

fn domestic_demand(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let filters = [DimensionFilter::new(
        "indicator",
        "modified total domestic demand",
    )];
    Ok(plain(cube_series(cubes, "NQQ46", &filters, &["time"])?))
}

fn current_account(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let filters = [DimensionFilter::new("balance", "Balance on Current Account")];
    let series = cube_series(cubes, "BPQ15", &filters, &["time"])?;
    // Source is in € million; report € billion.
    Ok(plain(scaled(series, 1e-3)))
}

fn employment(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let filters = [DimensionFilter::new("sex", "All persons")];
    Ok(plain(cube_series(cubes, "ALF01", &filters, &["time"])?))
}

fn live_register(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let filters = [DimensionFilter::new("season", "Seasonally adjusted")];
    let series = cube_series(cubes, "LRM02", &filters, &["time"])?;
    // Persons on the register, reported in thousands.
    Ok(plain(scaled(series, 1e-3)))
}

fn housing(cubes: &dyn CubeSource) -> Result<IndicatorRecord, SnapError> {
    let completions = cube_series(
        cubes,
        "NDQ01",
        &[DimensionFilter::new("type", "Total")],
        &["time"],
    );
    let permissions = cube_series(
        cubes,
        "BHQ05",
        &[DimensionFilter::new("type", "Total dwellings")],
        &["time"],
    );

    match (completions, permissions) {
        (Err(c), Err(p)) => {
            warn!(sub_series = "housing permissions", error = %p, "sub-series unavailable");
            Err(c)
        }
        (completions, permissions) => Ok(IndicatorRecord::Housing {
            completions: sub_series("housing completions", completions),
            permissions: sub_series("housing permissions", permissions),
        }),
    }
}

fn inflation(
    cubes: &dyn CubeSource,
    comparator: &dyn ComparatorSource,
) -> Result<IndicatorRecord, SnapError> {
    let ireland = cube_series(
        cubes,
        "HPM01",
        &[DimensionFilter::any_of("rate", ["Annual", "All-items"])],
        &["time"],
    );
    let ea19 = comparator.euro_area_inflation();

    match (ireland, ea19) {
        (Err(ie), Err(ea)) => {
            warn!(sub_series = "hicp ea19", error = %ea, "sub-series unavailable");
            Err(ie)
        }
        (ireland, ea19) => {
            let ea19 = match ea19 {
                Ok(series) => series,
                Err(err) => {
                    warn!(sub_series = "hicp ea19", error = %err, "sub-series unavailable");
                    SparseSeries::default()
                }
            };
            Ok(IndicatorRecord::Inflation {
                ireland: sub_series("hicp ireland", ireland),
                ea19,
            })
        }
    }
}

fn record_receipts(series: &mut BTreeMap<String, IndicatorRecord>, source: &dyn ReceiptsSource) {
    let parsed = source.fetch_csv().and_then(|text| parse_receipts(&text));
    let Some(receipts) = parsed else {
        // Explicitly best-effort: absence is a non-event, not a warning.
        debug!("exchequer receipts unavailable; omitting tax_receipts");
        return;
    };
    let (latest_total_month, latest_total_value) = match receipts.latest() {
        Some((month, value)) => (month.to_string(), value),
        None => return,
    };
    series.insert(
        "tax_receipts".to_string(),
        IndicatorRecord::Receipts {
            x: receipts.labels,
            total: receipts.totals,
            latest_total_month,
            latest_total_value,
        },
    );
}

/// Fetch a cube, narrow it, and extract the `(time, value)` series using the
/// heuristic time-column lookup.
fn cube_series(
    cubes: &dyn CubeSource,
    dataset: &str,
    filters: &[DimensionFilter],
    time_needles: &[&str],
) -> Result<Series, SnapError> {
    let table = slice(&cubes.dataset(dataset)?, filters);
    let (tcol, vcol) = resolve_columns(&table, time_needles)?;
    extract(&table, tcol, vcol)
}

fn resolve_columns(table: &Table, time_needles: &[&str]) -> Result<(usize, usize), SnapError> {
    let tcol = table.find_column_any(time_needles).ok_or_else(|| {
        SnapError::SchemaMismatch(format!("no time column matching {time_needles:?}"))
    })?;
    let vcol = table
        .find_column("value")
        .ok_or_else(|| SnapError::SchemaMismatch("no value column".into()))?;
    Ok((tcol, vcol))
}

fn plain(series: Series) -> IndicatorRecord {
    IndicatorRecord::Plain {
        x: series.x,
        y: series.y,
    }
}

/// Dense rescale through the nullable calculator; extraction guarantees the
/// input has no gaps.
fn scaled(series: Series, factor: f64) -> Series {
    let values: Vec<Option<f64>> = series.y.iter().copied().map(Some).collect();
    let y = metrics::rescale(&values, factor)
        .into_iter()
        .flatten()
        .collect();
    Series { x: series.x, y }
}

/// A composite's failed half degrades to an empty sub-series rather than
/// taking down the whole record.
fn sub_series(label: &str, result: Result<Series, SnapError>) -> Series {
    match result {
        Ok(series) => series,
        Err(err) => {
            warn!(sub_series = label, error = %err, "sub-series unavailable");
            Series::default()
        }
    }
}
