//! Department of Finance exchequer-receipts resolver.
//!
//! The databank export has no stable API contract: the endpoint moves, the
//! content type is unreliable, and header names drift across export
//! versions. The resolver is therefore explicitly best-effort — it tries a
//! short ordered list of candidate URLs, sniffs for something CSV-shaped,
//! and parses with loose header-alias matching. Total failure yields
//! "no data", never an error.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::SnapError;

const CANDIDATE_URLS: [&str; 2] = [
    "https://databank.finance.gov.ie/OpenDataSourceCSV?report=TaxYrOnYr",
    "http://databank.finance.gov.ie/FinDataBank.aspx?rep=OpenDataSourceCSV",
];

// Header aliases per logical field, tried in order. Names are matched
// against trimmed, lowercased headers.
const MONTH_ALIASES: [&str; 2] = ["period", "month"];
const YEAR_ALIASES: [&str; 2] = ["year", "fiscalyear"];
const TOTAL_ALIASES: [&str; 6] = [
    "totalreceipts",
    "total",
    "total receipts",
    "total_receipts",
    "receipts",
    "amount",
];

/// Source of the raw receipts export.
pub trait ReceiptsSource {
    /// Best-effort fetch: `None` when every candidate endpoint fails or
    /// nothing looks CSV-shaped. Callers treat this as an optional
    /// indicator, not a failure.
    fn fetch_csv(&self) -> Option<String>;
}

pub struct ExchequerClient {
    client: Client,
    urls: Vec<String>,
}

impl ExchequerClient {
    pub fn new() -> Result<Self, SnapError> {
        Ok(Self {
            client: Client::builder().timeout(super::FETCH_TIMEOUT).build()?,
            urls: CANDIDATE_URLS.iter().map(|u| u.to_string()).collect(),
        })
    }
}

impl ReceiptsSource for ExchequerClient {
    fn fetch_csv(&self) -> Option<String> {
        for url in &self.urls {
            let Ok(resp) = self.client.get(url).send() else {
                continue;
            };
            if !resp.status().is_success() {
                continue;
            }
            let declared_csv = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_ascii_lowercase().contains("csv"))
                .unwrap_or(false);
            let Ok(body) = resp.text() else {
                continue;
            };
            // Heuristic CSV sniff: a declared type, or any delimiter at all.
            if declared_csv || body.contains(',') || body.contains('\t') {
                return Some(body);
            }
        }
        None
    }
}

/// A parsed monthly-total series, ascending by month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReceipts {
    /// `"{year}-{month}"` labels, chronological.
    pub labels: Vec<String>,
    pub totals: Vec<f64>,
}

impl MonthlyReceipts {
    pub fn latest(&self) -> Option<(&str, f64)> {
        match (self.labels.last(), self.totals.last()) {
            (Some(label), Some(total)) => Some((label.as_str(), *total)),
            _ => None,
        }
    }
}

/// Parse the accepted text as a header-labeled table.
///
/// Per row: resolve month, year, and total through the alias lists; strip
/// thousands separators from the total; skip the row if anything is missing
/// or unparseable (including the period date — a bad row never aborts the
/// whole resolution). Rows are keyed `"{year}-{month}"` and duplicate keys
/// overwrite, last write wins. `None` when zero rows survive.
pub fn parse_receipts(text: &str) -> Option<MonthlyReceipts> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().ok()?.clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header(name), idx))
        .collect();

    let mut by_period: HashMap<String, (NaiveDate, f64)> = HashMap::new();

    for record in reader.records() {
        let Ok(record) = record else { continue };
        let Some(month) = field(&record, &header_map, &MONTH_ALIASES) else {
            continue;
        };
        let Some(year) = field(&record, &header_map, &YEAR_ALIASES) else {
            continue;
        };
        let Some(raw_total) = field(&record, &header_map, &TOTAL_ALIASES) else {
            continue;
        };

        let Ok(total) = raw_total.replace(',', "").parse::<f64>() else {
            continue;
        };
        let Some(date) = parse_period(year, month) else {
            continue;
        };
        by_period.insert(format!("{year}-{month}"), (date, total));
    }

    if by_period.is_empty() {
        return None;
    }

    let mut rows: Vec<(String, NaiveDate, f64)> = by_period
        .into_iter()
        .map(|(label, (date, total))| (label, date, total))
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    Some(MonthlyReceipts {
        labels: rows.iter().map(|(label, _, _)| label.clone()).collect(),
        totals: rows.iter().map(|(_, _, total)| *total).collect(),
    })
}

/// First alias present in the headers whose cell is non-empty on this row.
/// An alias whose column exists but is blank falls through to the next one.
fn field<'a>(
    record: &'a StringRecord,
    headers: &HashMap<String, usize>,
    aliases: &[&str],
) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        let idx = headers.get(*alias)?;
        record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
    })
}

fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// The export alternates month representations across versions: 3-letter
/// abbreviations ("Jan") and 2-digit numerics ("01"), chosen per token by
/// length. A 2-letter locale month token would misparse here; that ambiguity
/// is inherited from the source format.
fn parse_period(year: &str, month: &str) -> Option<NaiveDate> {
    let fmt = if month.len() == 3 { "%Y-%b-%d" } else { "%Y-%m-%d" };
    NaiveDate::parse_from_str(&format!("{year}-{month}-01"), fmt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_abbreviated_months_chronologically() {
        let csv = "Month,Year,Total\nJan,2023,100\nFeb,2023,110\nDec,2022,90\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2022-Dec", "2023-Jan", "2023-Feb"]);
        assert_eq!(r.totals, vec![90.0, 100.0, 110.0]);
        assert_eq!(r.latest(), Some(("2023-Feb", 110.0)));
    }

    #[test]
    fn accepts_numeric_months_and_thousands_separators() {
        let csv = "Period,Year,Receipts\n02,2024,\"2,345.5\"\n01,2024,\"1,234.5\"\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(r.totals, vec![1234.5, 2345.5]);
    }

    #[test]
    fn duplicate_periods_overwrite_last_write_wins() {
        let csv = "Month,Year,Total\nJan,2024,100\nJan,2024,250\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2024-Jan"]);
        assert_eq!(r.totals, vec![250.0]);
    }

    #[test]
    fn bad_rows_are_skipped_not_fatal() {
        let csv = "Month,Year,Total\n\
                   Jan,2024,100\n\
                   ,2024,50\n\
                   Feb,,60\n\
                   Mar,2024,not-a-number\n\
                   Janu,2024,70\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2024-Jan"]);
    }

    #[test]
    fn alias_order_resolves_per_row() {
        // "Period" exists but is blank on the second row, so "Month" is used.
        let csv = "Period,Month,Year,Amount\nJan,xxx,2024,10\n,Feb,2024,20\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2024-Jan", "2024-Feb"]);
        assert_eq!(r.totals, vec![10.0, 20.0]);
    }

    #[test]
    fn no_surviving_rows_yields_none() {
        assert_eq!(parse_receipts("Month,Year,Total\n"), None);
        assert_eq!(parse_receipts("Something,Else\na,b\n"), None);
    }

    #[test]
    fn mixed_month_formats_sort_together() {
        let csv = "Month,Year,Total\n03,2024,30\nJan,2024,10\nFeb,2024,20\n";
        let r = parse_receipts(csv).unwrap();
        assert_eq!(r.labels, vec!["2024-Jan", "2024-Feb", "2024-03"]);
        assert_eq!(r.totals, vec![10.0, 20.0, 30.0]);
    }
}
