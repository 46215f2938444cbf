//! Euro-area inflation comparator (ECB statistical data warehouse).
//!
//! The wire format differs from the cube documents: observation values are
//! keyed by *positional index* (a string-encoded integer) against a
//! separately supplied list of period tokens, so alignment is explicitly
//! positional rather than a join. Indices without an entry denote missing
//! observations for that period.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::domain::SparseSeries;
use crate::error::SnapError;

const HICP_EA_URL: &str =
    "https://sdw.ecb.europa.eu/servlet/data/ICP/M.U2.N.000000.4.ANR?lastNObservations=72&format=jsondata";

/// Source of the euro-area all-items annual inflation series.
pub trait ComparatorSource {
    fn euro_area_inflation(&self) -> Result<SparseSeries, SnapError>;
}

pub struct EcbClient {
    client: Client,
    url: String,
}

impl EcbClient {
    pub fn new() -> Result<Self, SnapError> {
        Ok(Self {
            client: Client::builder().timeout(super::FETCH_TIMEOUT).build()?,
            url: HICP_EA_URL.to_string(),
        })
    }
}

impl ComparatorSource for EcbClient {
    fn euro_area_inflation(&self) -> Result<SparseSeries, SnapError> {
        let resp = self.client.get(&self.url).send()?;
        if !resp.status().is_success() {
            return Err(SnapError::Fetch(format!(
                "{}: status {}",
                self.url,
                resp.status()
            )));
        }
        let doc: Value = resp
            .json()
            .map_err(|e| SnapError::Fetch(format!("{}: {e}", self.url)))?;
        align_observations(&doc)
    }
}

/// Align the positional observation map of the first series against the
/// period-token list. Gaps become `None`.
pub fn align_observations(doc: &Value) -> Result<SparseSeries, SnapError> {
    let periods = doc
        .pointer("/structure/dimensions/observation/0/values")
        .and_then(Value::as_array)
        .ok_or_else(|| SnapError::SchemaMismatch("no observation period list".into()))?;

    let x: Vec<String> = periods
        .iter()
        .map(|v| {
            v.get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| SnapError::SchemaMismatch("period token without id".into()))
        })
        .collect::<Result<_, _>>()?;

    let series = doc
        .pointer("/dataSets/0/series")
        .and_then(Value::as_object)
        .ok_or_else(|| SnapError::SchemaMismatch("data set has no series map".into()))?;
    let (_, first) = series
        .iter()
        .next()
        .ok_or_else(|| SnapError::SchemaMismatch("series map is empty".into()))?;
    let obs = first
        .get("observations")
        .and_then(Value::as_object)
        .ok_or_else(|| SnapError::SchemaMismatch("series has no observations".into()))?;

    let y = (0..x.len())
        .map(|i| {
            obs.get(&i.to_string())
                .and_then(|entry| entry.get(0))
                .and_then(Value::as_f64)
        })
        .collect();

    Ok(SparseSeries { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aligns_observations_positionally_with_gaps() {
        let doc = json!({
            "structure": {"dimensions": {"observation": [
                {"values": [{"id": "2024-01"}, {"id": "2024-02"}, {"id": "2024-03"}]}
            ]}},
            "dataSets": [{"series": {
                "0:0:0:0:0": {"observations": {"0": [2.8], "2": [2.4]}}
            }}]
        });
        let s = align_observations(&doc).unwrap();
        assert_eq!(s.x, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(s.y, vec![Some(2.8), None, Some(2.4)]);
    }

    #[test]
    fn missing_structure_is_a_schema_mismatch() {
        let doc = json!({"dataSets": []});
        assert!(matches!(
            align_observations(&doc),
            Err(SnapError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn empty_series_map_is_a_schema_mismatch() {
        let doc = json!({
            "structure": {"dimensions": {"observation": [{"values": []}]}},
            "dataSets": [{"series": {}}]
        });
        assert!(matches!(
            align_observations(&doc),
            Err(SnapError::SchemaMismatch(_))
        ));
    }
}
