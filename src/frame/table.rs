//! The in-memory tabular structure produced by the source adapters.
//!
//! Provider schemas are dynamic: dimension columns vary per dataset and are
//! only discoverable at runtime. Columns are therefore looked up by
//! case-insensitive substring, and the result is an explicit `Option` rather
//! than an exception-shaped control flow.

/// A single cell. Dimension columns hold `Text`, the value column holds
/// `Number` or `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell as a period label. Integral numbers print without a
    /// trailing `.0` so years read as `"2024"`, not `"2024.0"`.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Cell::Number(n) => Some(n.to_string()),
            Cell::Null => None,
        }
    }
}

/// An ordered sequence of rows sharing one column set.
///
/// The invariant that every row is aligned to `columns` is enforced
/// structurally: rows are stored positionally, not as per-row maps.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row/column arity mismatch");
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First column whose name contains `needle`, case-insensitive.
    pub fn find_column(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_ascii_lowercase();
        self.columns
            .iter()
            .position(|c| c.to_ascii_lowercase().contains(&needle))
    }

    /// First column matching any of the given needles, tried in order.
    pub fn find_column_any(&self, needles: &[&str]) -> Option<usize> {
        needles.iter().find_map(|n| self.find_column(n))
    }

    /// Retain only the rows for which `keep` returns true, preserving order.
    pub(crate) fn retain_rows(&self, keep: impl Fn(&[Cell]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| keep(r.as_slice()))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_column_is_case_insensitive_substring() {
        let t = Table::new(vec!["Statistic".into(), "Quarter".into(), "value".into()]);
        assert_eq!(t.find_column("stat"), Some(0));
        assert_eq!(t.find_column("QUART"), Some(1));
        assert_eq!(t.find_column("month"), None);
    }

    #[test]
    fn find_column_any_respects_needle_order() {
        let t = Table::new(vec!["Year".into(), "Time Period".into()]);
        // "time" is tried first even though "Year" appears earlier.
        assert_eq!(t.find_column_any(&["time", "year"]), Some(1));
        assert_eq!(t.find_column_any(&["month", "year"]), Some(0));
    }

    #[test]
    fn number_labels_drop_trailing_zero() {
        assert_eq!(Cell::Number(2024.0).label().as_deref(), Some("2024"));
        assert_eq!(Cell::Number(2.5).label().as_deref(), Some("2.5"));
        assert_eq!(Cell::Null.label(), None);
    }
}
