//! Anomaly report table.

use std::path::Path;

use editfx_models::coerce::lenient_bool;
use editfx_models::{AnnotationRecord, AnomalyEntry, VideoId};
use tracing::info;

use crate::dataset::Dataset;
use crate::error::{StorageError, StorageResult};

/// Identity header used when the source dataset had no id column.
pub const ROW_INDEX_COLUMN: &str = "video_row_index";

const RULE_COLUMNS: [&str; 5] = [
    "rule_sound_and_bgm",
    "rule_overuse_counts",
    "rule_text_conflict",
    "has_anomaly",
    "anomalies_joined",
];

fn bool_cell(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Build the report table. `id_header` names the identity column.
pub fn to_dataset(entries: &[AnomalyEntry], id_header: Option<&str>) -> Dataset {
    let id_header = id_header.unwrap_or(ROW_INDEX_COLUMN);
    let headers = std::iter::once(id_header)
        .chain(RULE_COLUMNS)
        .map(str::to_string)
        .collect();

    let records = entries
        .iter()
        .map(|e| {
            AnnotationRecord::new()
                .with(id_header, e.video_id.as_str())
                .with("rule_sound_and_bgm", bool_cell(e.rule_sound_and_bgm))
                .with("rule_overuse_counts", bool_cell(e.rule_overuse_counts))
                .with("rule_text_conflict", bool_cell(e.rule_text_conflict))
                .with("has_anomaly", bool_cell(e.has_anomaly))
                .with("anomalies_joined", e.anomalies_joined.as_str())
        })
        .collect();

    Dataset::new(headers, records)
}

/// Write the report, replacing any previous one.
pub fn write_report(
    path: impl AsRef<Path>,
    entries: &[AnomalyEntry],
    id_header: Option<&str>,
) -> StorageResult<()> {
    let path = path.as_ref();
    to_dataset(entries, id_header).save(path)?;
    info!(path = %path.display(), flagged = entries.len(), "Wrote anomaly report");
    Ok(())
}

/// Read a previously written report.
pub fn read_report(path: impl AsRef<Path>) -> StorageResult<Vec<AnomalyEntry>> {
    let dataset = Dataset::load(path)?;
    let id_column = match dataset.detect_id_column() {
        Some(col) => col.to_string(),
        None if dataset.has_column(ROW_INDEX_COLUMN) => ROW_INDEX_COLUMN.to_string(),
        None => return Err(StorageError::missing_column("video_id")),
    };

    let entries = dataset
        .records
        .iter()
        .filter_map(|r| {
            let video_id = r.video_id(&id_column)?;
            Some(AnomalyEntry {
                video_id,
                rule_sound_and_bgm: lenient_bool(r.get("rule_sound_and_bgm")),
                rule_overuse_counts: lenient_bool(r.get("rule_overuse_counts")),
                rule_text_conflict: lenient_bool(r.get("rule_text_conflict")),
                has_anomaly: r.get("has_anomaly").map_or(true, |v| lenient_bool(Some(v))),
                anomalies_joined: r.get("anomalies_joined").unwrap_or("").to_string(),
            })
        })
        .collect();
    Ok(entries)
}

/// Ids listed in a report, in file order.
pub fn report_ids(entries: &[AnomalyEntry]) -> Vec<VideoId> {
    entries.iter().map(|e| e.video_id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(id: &str) -> AnomalyEntry {
        AnomalyEntry {
            video_id: VideoId::from(id),
            rule_sound_and_bgm: true,
            rule_overuse_counts: false,
            rule_text_conflict: false,
            has_anomaly: true,
            anomalies_joined: "Both sound effects and background music are present".into(),
        }
    }

    #[test]
    fn test_report_headers() {
        let ds = to_dataset(&[entry("a")], Some("video_id"));
        assert_eq!(ds.headers[0], "video_id");
        assert_eq!(ds.headers.len(), 6);

        let ds = to_dataset(&[entry("3")], None);
        assert_eq!(ds.headers[0], ROW_INDEX_COLUMN);
        assert_eq!(ds.records[0].get("rule_sound_and_bgm"), Some("True"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anomalies").join("sports_anomalies.csv");
        let entries = vec![entry("a"), entry("b")];

        write_report(&path, &entries, Some("videoId")).unwrap();
        let read = read_report(&path).unwrap();
        assert_eq!(read, entries);
        assert_eq!(report_ids(&read), vec![VideoId::from("a"), VideoId::from("b")]);
    }

    #[test]
    fn test_read_report_without_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.csv");
        std::fs::write(&path, "anomalies_joined\nx\n").unwrap();
        assert!(matches!(read_report(&path), Err(StorageError::MissingColumn(_))));
    }
}
