//! Snapshot JSON writer.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::domain::Snapshot;
use crate::error::SnapError;

/// Write the snapshot pretty-printed to `path`, creating parent directories
/// as needed. This is the only persisted state of a run.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IndicatorRecord;
    use std::collections::BTreeMap;

    #[test]
    fn writes_pretty_json_with_missing_parents() {
        let dir = std::env::temp_dir().join("econsnap-write-test");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("snapshot.json");

        let mut series = BTreeMap::new();
        series.insert(
            "mdd".to_string(),
            IndicatorRecord::Plain {
                x: vec!["2024Q1".into()],
                y: vec![1.0],
            },
        );
        let snapshot = Snapshot {
            generated_at: "2025-01-01T00:00:00+00:00".into(),
            series,
        };

        write_snapshot(&path, &snapshot).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"generated_at\""));
        assert!(text.contains("\"mdd\""));

        let _ = fs::remove_dir_all(&dir);
    }
}
