//! CSO PxStat cube client.
//!
//! PxStat serves each dataset as a JSON-stat 2.0 cube: named dimensions with
//! ordered categories plus one flat value array keyed by dimension-index
//! tuples. The rest of the pipeline only ever sees the flattened form — one
//! row per dimension combination, one column per dimension label, and a
//! trailing `value` column.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::SnapError;
use crate::frame::{Cell, Table};

const BASE_URL: &str = "https://ws.cso.ie/public/api.restful";

/// A provider of multi-dimensional statistical datasets, consumed only
/// through their flattened tabular form.
pub trait CubeSource {
    fn dataset(&self, table: &str) -> Result<Table, SnapError>;
}

pub struct PxStatClient {
    client: Client,
    base_url: String,
}

impl PxStatClient {
    pub fn new() -> Result<Self, SnapError> {
        Ok(Self {
            client: Client::builder().timeout(super::FETCH_TIMEOUT).build()?,
            base_url: BASE_URL.to_string(),
        })
    }
}

impl CubeSource for PxStatClient {
    fn dataset(&self, table: &str) -> Result<Table, SnapError> {
        let url = format!(
            "{}/PxStat.Data.Cube_API.ReadDataset/{}/JSON-stat/2.0/en",
            self.base_url, table
        );
        let resp = self.client.get(&url).send()?;
        if !resp.status().is_success() {
            return Err(SnapError::Fetch(format!("{url}: status {}", resp.status())));
        }
        let doc: Value = resp
            .json()
            .map_err(|e| SnapError::Fetch(format!("{url}: {e}")))?;
        cube_to_table(&doc)
    }
}

struct Dimension {
    label: String,
    categories: Vec<String>,
}

/// Flatten a JSON-stat 2.0 cube into a `Table`.
///
/// Dimension order comes from `id`, category order from `category.index`
/// (array or object form), and the value array is expanded row-major with
/// the last dimension varying fastest. Missing or null entries become
/// `Cell::Null`.
pub fn cube_to_table(doc: &Value) -> Result<Table, SnapError> {
    let ids = doc
        .get("id")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch("cube has no dimension id list"))?;
    let sizes = doc
        .get("size")
        .and_then(Value::as_array)
        .ok_or_else(|| mismatch("cube has no size list"))?;
    if ids.len() != sizes.len() {
        return Err(mismatch("id and size lists differ in length"));
    }
    let dims_obj = doc
        .get("dimension")
        .and_then(Value::as_object)
        .ok_or_else(|| mismatch("cube has no dimension map"))?;

    let mut dims = Vec::with_capacity(ids.len());
    for (id, size) in ids.iter().zip(sizes) {
        let id = id
            .as_str()
            .ok_or_else(|| mismatch("dimension id is not a string"))?;
        let size = size
            .as_u64()
            .ok_or_else(|| mismatch(format!("dimension '{id}' has a non-integer size")))?
            as usize;
        let dim = dims_obj
            .get(id)
            .ok_or_else(|| mismatch(format!("dimension '{id}' missing from dimension map")))?;
        dims.push(read_dimension(id, dim, size)?);
    }

    let mut columns: Vec<String> = dims.iter().map(|d| d.label.clone()).collect();
    columns.push("value".to_string());
    let mut out = Table::new(columns);

    let values = doc
        .get("value")
        .ok_or_else(|| mismatch("cube has no value array"))?;
    let total: usize = dims.iter().map(|d| d.categories.len()).product();

    for flat in 0..total {
        let mut indices = vec![0usize; dims.len()];
        let mut rem = flat;
        // Row-major expansion: the last dimension varies fastest.
        for (d, dim) in dims.iter().enumerate().rev() {
            indices[d] = rem % dim.categories.len();
            rem /= dim.categories.len();
        }

        let mut row = Vec::with_capacity(dims.len() + 1);
        for (d, dim) in dims.iter().enumerate() {
            row.push(Cell::Text(dim.categories[indices[d]].clone()));
        }
        row.push(value_cell(values, flat));
        out.push_row(row);
    }

    Ok(out)
}

fn read_dimension(id: &str, dim: &Value, size: usize) -> Result<Dimension, SnapError> {
    let label = dim
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or(id)
        .to_string();
    let category = dim
        .get("category")
        .ok_or_else(|| mismatch(format!("dimension '{id}' has no category")))?;
    let labels = category.get("label").and_then(Value::as_object);

    // Category codes in declared order.
    let codes: Vec<String> = match category.get("index") {
        Some(Value::Array(arr)) => arr
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| mismatch(format!("dimension '{id}': non-string category code")))
            })
            .collect::<Result<_, _>>()?,
        Some(Value::Object(map)) => {
            let mut pairs: Vec<(String, u64)> = map
                .iter()
                .map(|(code, pos)| {
                    pos.as_u64()
                        .map(|p| (code.clone(), p))
                        .ok_or_else(|| mismatch(format!("dimension '{id}': non-integer index")))
                })
                .collect::<Result<_, _>>()?;
            pairs.sort_by_key(|(_, p)| *p);
            pairs.into_iter().map(|(code, _)| code).collect()
        }
        // A single-category dimension may omit `index` entirely.
        None => labels
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default(),
        Some(_) => {
            return Err(mismatch(format!("dimension '{id}': unrecognized index form")));
        }
    };

    if codes.len() != size {
        return Err(mismatch(format!(
            "dimension '{id}': {} categories but declared size {size}",
            codes.len()
        )));
    }

    let categories = codes
        .iter()
        .map(|code| {
            labels
                .and_then(|m| m.get(code))
                .and_then(Value::as_str)
                .unwrap_or(code)
                .to_string()
        })
        .collect();

    Ok(Dimension { label, categories })
}

fn value_cell(values: &Value, flat: usize) -> Cell {
    let v = match values {
        Value::Array(arr) => arr.get(flat),
        // Sparse form: flat indices encoded as string keys.
        Value::Object(map) => map.get(&flat.to_string()),
        _ => None,
    };
    match v {
        Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Cell::Number)
            .unwrap_or_else(|_| Cell::Text(s.clone())),
        _ => Cell::Null,
    }
}

fn mismatch(msg: impl Into<String>) -> SnapError {
    SnapError::SchemaMismatch(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_by_two() -> Value {
        json!({
            "id": ["SEX", "TLIST(Q1)"],
            "size": [2, 2],
            "dimension": {
                "SEX": {
                    "label": "Sex",
                    "category": {
                        "index": {"M": 0, "F": 1},
                        "label": {"M": "Male", "F": "Female"}
                    }
                },
                "TLIST(Q1)": {
                    "label": "Quarter",
                    "category": {
                        "index": ["2024Q1", "2024Q2"],
                        "label": {"2024Q1": "2024Q1", "2024Q2": "2024Q2"}
                    }
                }
            },
            "value": [1.0, 2.0, 3.0, null]
        })
    }

    #[test]
    fn flattens_row_major_with_last_dimension_fastest() {
        let t = cube_to_table(&two_by_two()).unwrap();
        assert_eq!(t.columns(), &["Sex", "Quarter", "value"]);
        assert_eq!(t.len(), 4);

        let row = &t.rows()[1];
        assert_eq!(row[0], Cell::Text("Male".into()));
        assert_eq!(row[1], Cell::Text("2024Q2".into()));
        assert_eq!(row[2], Cell::Number(2.0));

        let row = &t.rows()[2];
        assert_eq!(row[0], Cell::Text("Female".into()));
        assert_eq!(row[1], Cell::Text("2024Q1".into()));
    }

    #[test]
    fn null_values_become_null_cells() {
        let t = cube_to_table(&two_by_two()).unwrap();
        assert_eq!(t.rows()[3][2], Cell::Null);
    }

    #[test]
    fn object_index_is_ordered_by_position() {
        let doc = json!({
            "id": ["A"],
            "size": [3],
            "dimension": {
                "A": {
                    "category": {
                        "index": {"z": 2, "x": 0, "y": 1},
                        "label": {"x": "First", "y": "Second", "z": "Third"}
                    }
                }
            },
            "value": [10.0, 20.0, 30.0]
        });
        let t = cube_to_table(&doc).unwrap();
        // Label falls back to the dimension id when absent.
        assert_eq!(t.columns(), &["A", "value"]);
        let first: Vec<_> = t.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            first,
            vec![
                Cell::Text("First".into()),
                Cell::Text("Second".into()),
                Cell::Text("Third".into())
            ]
        );
    }

    #[test]
    fn sparse_object_values_fill_gaps_with_null() {
        let doc = json!({
            "id": ["A"],
            "size": [3],
            "dimension": {
                "A": {"category": {"index": ["a", "b", "c"]}}
            },
            "value": {"0": 1.5, "2": 3.5}
        });
        let t = cube_to_table(&doc).unwrap();
        assert_eq!(t.rows()[0][1], Cell::Number(1.5));
        assert_eq!(t.rows()[1][1], Cell::Null);
        assert_eq!(t.rows()[2][1], Cell::Number(3.5));
    }

    #[test]
    fn missing_dimension_map_is_a_schema_mismatch() {
        let doc = json!({"id": ["A"], "size": [1], "value": []});
        assert!(matches!(
            cube_to_table(&doc),
            Err(SnapError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn category_count_must_match_declared_size() {
        let doc = json!({
            "id": ["A"],
            "size": [2],
            "dimension": {"A": {"category": {"index": ["only"]}}},
            "value": [1.0]
        });
        assert!(matches!(
            cube_to_table(&doc),
            Err(SnapError::SchemaMismatch(_))
        ));
    }
}
