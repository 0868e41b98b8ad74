//! CSV-backed record table.
//!
//! Column order from the source file is preserved on save. Columns not known
//! to the schema pass through untouched.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use editfx_models::{AnnotationRecord, VideoId, FIELDS};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::fs_utils::write_atomic;

/// Column names tried, in order, when looking for the record identity.
pub const ID_COLUMN_CANDIDATES: &[&str] = &["video_id", "id", "videoId", "videoID", "video_key", "videoKey"];

/// Presence flags of which at least one must be true for a row to survive
/// [`Dataset::prune_effectless`].
pub const VISUAL_EFFECT_FLAGS: &[&str] = &[
    "transitions_present",
    "b_roll_footage_present",
    "animated_graphics_present",
    "on_screen_text_present",
];

/// An ordered table of annotation records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<AnnotationRecord>,
    /// Synthetic keys standing in for blank header cells, written back blank
    unnamed: HashSet<String>,
}

/// Key for a blank header at `idx`, unique among `taken`.
fn unnamed_key(idx: usize, taken: &HashSet<String>) -> String {
    let mut key = format!("Unnamed: {}", idx);
    while taken.contains(&key) {
        key.push('_');
    }
    key
}

impl Dataset {
    pub fn new(headers: Vec<String>, records: Vec<AnnotationRecord>) -> Self {
        Self {
            headers,
            records,
            unnamed: HashSet::new(),
        }
    }

    /// Read a CSV file with a header row.
    ///
    /// Short rows are padded with empty cells.
    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StorageError::not_found(path));
        }
        let file = File::open(path)?;
        let dataset = Self::from_reader(file)?;

        info!(
            path = %path.display(),
            rows = dataset.records.len(),
            columns = dataset.headers.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse CSV text.
    ///
    /// Blank header cells (such as a leading index column) are kept under a
    /// synthetic `Unnamed: N` key and written back blank.
    pub fn from_reader<R: std::io::Read>(reader: R) -> StorageResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let raw: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut taken: HashSet<String> = raw.iter().filter(|h| !h.trim().is_empty()).cloned().collect();
        let mut unnamed = HashSet::new();
        let mut headers = Vec::with_capacity(raw.len());
        for (idx, header) in raw.into_iter().enumerate() {
            if header.trim().is_empty() {
                let key = unnamed_key(idx, &taken);
                taken.insert(key.clone());
                unnamed.insert(key.clone());
                headers.push(key);
            } else {
                headers.push(header);
            }
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record = headers
                .iter()
                .enumerate()
                .map(|(idx, h)| (h.clone(), row.get(idx).unwrap_or("").to_string()))
                .collect();
            records.push(record);
        }

        Ok(Self {
            headers,
            records,
            unnamed,
        })
    }

    /// Serialize as CSV in header order.
    pub fn write_csv<W: Write>(&self, writer: W) -> StorageResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(
            self.headers
                .iter()
                .map(|h| if self.unnamed.contains(h) { "" } else { h.as_str() }),
        )?;
        for record in &self.records {
            out.write_record(self.headers.iter().map(|h| record.get(h).unwrap_or("")))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Atomically replace `path` with this table.
    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        write_atomic(path, |out| self.write_csv(out))?;
        debug!(path = %path.display(), rows = self.records.len(), "Saved dataset");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// First identity column present in the headers.
    pub fn detect_id_column(&self) -> Option<&str> {
        ID_COLUMN_CANDIDATES
            .iter()
            .copied()
            .find(|candidate| self.has_column(candidate))
    }

    /// Like [`detect_id_column`](Self::detect_id_column) but fails when none exists.
    pub fn require_id_column(&self) -> StorageResult<String> {
        self.detect_id_column()
            .map(str::to_string)
            .ok_or_else(|| StorageError::missing_column(ID_COLUMN_CANDIDATES.join(" | ")))
    }

    /// Append any schema field missing from the headers, with empty cells.
    ///
    /// Returns the columns that were added.
    pub fn ensure_schema_columns(&mut self) -> Vec<&'static str> {
        let missing: Vec<&'static str> = FIELDS
            .iter()
            .map(|f| f.name)
            .filter(|name| !self.has_column(name))
            .collect();

        for name in &missing {
            self.headers.push(name.to_string());
            for record in &mut self.records {
                if !record.contains(name) {
                    record.set(*name, "");
                }
            }
        }

        if !missing.is_empty() {
            debug!(added = ?missing, "Backfilled schema columns");
        }
        missing
    }

    /// Row position of the first record whose id matches.
    pub fn position(&self, id_column: &str, video_id: &VideoId) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.video_id(id_column).as_ref() == Some(video_id))
    }

    /// Drop later rows sharing a video id, keeping the first occurrence.
    ///
    /// Rows with a blank id are always kept. Returns the number removed.
    pub fn dedupe(&mut self, id_column: &str) -> usize {
        let before = self.records.len();
        let mut seen: HashSet<VideoId> = HashSet::new();
        self.records.retain(|record| match record.video_id(id_column) {
            Some(id) => seen.insert(id),
            None => true,
        });
        before - self.records.len()
    }

    /// Remove rows where none of [`VISUAL_EFFECT_FLAGS`] is truthy.
    ///
    /// Returns the ids of removed rows (blank ids are skipped).
    pub fn prune_effectless(&mut self, id_column: Option<&str>) -> Vec<VideoId> {
        let mut removed = Vec::new();
        self.records.retain(|record| {
            let keep = VISUAL_EFFECT_FLAGS
                .iter()
                .any(|flag| editfx_models::coerce::lenient_bool(record.get(flag)));
            if !keep {
                if let Some(id) = id_column.and_then(|col| record.video_id(col)) {
                    removed.push(id);
                }
            }
            keep
        });
        removed
    }
}
