//! Append-only JSON Lines change log.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use editfx_models::ChangeLogEntry;
use tracing::{debug, warn};

use crate::error::StorageResult;

/// One JSON object per line; existing lines are never rewritten.
#[derive(Debug, Clone)]
pub struct ChangeLog {
    path: PathBuf,
}

impl ChangeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk.
    pub fn append(&self, entry: &ChangeLogEntry) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        debug!(
            video_id = %entry.video_id,
            fields = entry.changes.len(),
            "Appended change log entry"
        );
        Ok(())
    }

    /// Read all parseable entries. Malformed lines are skipped with a warning.
    pub fn read_all(&self) -> StorageResult<Vec<ChangeLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(fs::File::open(&self.path)?);

        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = idx + 1, error = %e, "Skipping malformed change log line"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editfx_models::{FieldValue, VideoId};
    use tempfile::TempDir;

    fn entry(id: &str) -> ChangeLogEntry {
        let mut entry = ChangeLogEntry::new(VideoId::from(id));
        entry.record("b_roll_count", FieldValue::Int(4), FieldValue::Int(2));
        entry
    }

    #[test]
    fn test_append_preserves_existing_lines() {
        let dir = TempDir::new().unwrap();
        let log = ChangeLog::new(dir.path().join("edits_log.jsonl"));

        log.append(&entry("a")).unwrap();
        let first = fs::read_to_string(log.path()).unwrap();
        log.append(&entry("b")).unwrap();
        let both = fs::read_to_string(log.path()).unwrap();

        assert!(both.starts_with(&first));
        assert_eq!(both.lines().count(), 2);

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].video_id, VideoId::from("b"));
        assert_eq!(entries[0].changes["b_roll_count"].new, FieldValue::Int(2));
    }

    #[test]
    fn test_read_all_skips_garbage() {
        let dir = TempDir::new().unwrap();
        let log = ChangeLog::new(dir.path().join("log.jsonl"));
        log.append(&entry("a")).unwrap();
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{not json").unwrap();

        assert_eq!(log.read_all().unwrap().len(), 1);
        assert!(ChangeLog::new(dir.path().join("missing.jsonl")).read_all().unwrap().is_empty());
    }
}
