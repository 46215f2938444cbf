//! Dimension slicing: narrowing a table to the intended slice of a cube.

use crate::frame::Table;

/// One slicing rule: the first column whose name contains `column`
/// (case-insensitive) is narrowed to rows whose text contains any of
/// `any_of` (case-insensitive).
///
/// Filters are applied in order against the progressively narrowed table,
/// and each filter re-scans the current column set. Two filters whose name
/// substrings happen to match the same column (e.g. `"stat"` and
/// `"indicator"` against a combined `"Statistic Indicator"` column) will
/// therefore both operate on that column. This is a known ambiguity of
/// substring matching against dynamic schemas, kept visible here rather than
/// silently resolved.
#[derive(Debug, Clone)]
pub struct DimensionFilter {
    column: String,
    any_of: Vec<String>,
}

impl DimensionFilter {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            any_of: vec![value.into()],
        }
    }

    /// A filter that keeps a row when the cell matches any of the given
    /// value substrings.
    pub fn any_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            any_of: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Apply the filters as an explicit fold over the table.
///
/// A filter whose column substring matches nothing is skipped silently:
/// provider schemas vary across datasets and some filters are simply
/// inapplicable to a given table. Rows with a null (or non-text) cell in a
/// filtered column are dropped. The input table is never mutated.
pub fn slice(table: &Table, filters: &[DimensionFilter]) -> Table {
    filters
        .iter()
        .fold(table.clone(), |narrowed, filter| apply(&narrowed, filter))
}

fn apply(table: &Table, filter: &DimensionFilter) -> Table {
    let Some(col) = table.find_column(&filter.column) else {
        return table.clone();
    };

    let wanted: Vec<String> = filter
        .any_of
        .iter()
        .map(|v| v.to_ascii_lowercase())
        .collect();

    table.retain_rows(|row| match row[col].as_text() {
        Some(text) => {
            let text = text.to_ascii_lowercase();
            wanted.iter().any(|w| text.contains(w))
        }
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Cell;

    fn sample() -> Table {
        let mut t = Table::new(vec!["Sex".into(), "Quarter".into(), "value".into()]);
        t.push_row(vec![
            Cell::Text("All persons".into()),
            Cell::Text("2024Q1".into()),
            Cell::Number(4.3),
        ]);
        t.push_row(vec![
            Cell::Text("Male".into()),
            Cell::Text("2024Q1".into()),
            Cell::Number(4.5),
        ]);
        t.push_row(vec![
            Cell::Null,
            Cell::Text("2024Q2".into()),
            Cell::Number(4.1),
        ]);
        t
    }

    #[test]
    fn slice_never_increases_row_count() {
        let t = sample();
        let out = slice(&t, &[DimensionFilter::new("sex", "All persons")]);
        assert!(out.len() <= t.len());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn unmatched_filter_leaves_table_unchanged() {
        let t = sample();
        let out = slice(&t, &[DimensionFilter::new("season", "Seasonally adjusted")]);
        assert_eq!(out.len(), t.len());
    }

    #[test]
    fn null_cells_are_dropped_by_a_matching_filter() {
        let t = sample();
        // Matches both "All persons" and "Male" by substring, drops the null row.
        let out = slice(&t, &[DimensionFilter::new("sex", "al")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn filters_compose_conjunctively_in_order() {
        let t = sample();
        let out = slice(
            &t,
            &[
                DimensionFilter::new("sex", "All persons"),
                DimensionFilter::new("quarter", "2024Q2"),
            ],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn any_of_keeps_rows_matching_either_value() {
        let t = sample();
        let out = slice(
            &t,
            &[DimensionFilter::any_of("sex", ["All persons", "Male"])],
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = sample();
        let out = slice(&t, &[DimensionFilter::new("SEX", "all PERSONS")]);
        assert_eq!(out.len(), 1);
    }
}
