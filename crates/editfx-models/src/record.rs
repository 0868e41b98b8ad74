//! Raw dataset rows.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity key of a video within a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string, trimming surrounding whitespace.
    pub fn from_string(s: impl Into<String>) -> Self {
        let s: String = s.into();
        Self(s.trim().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is blank.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

/// One dataset row, column name to raw cell text.
///
/// Unknown columns are carried untouched so that rewriting a dataset never
/// drops data the schema does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationRecord {
    cells: BTreeMap<String, String>,
}

impl AnnotationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cell text, if the column is present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Set a cell, inserting the column if needed.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder form of [`AnnotationRecord::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Identity under the given id column, blank ids treated as absent.
    pub fn video_id(&self, id_column: &str) -> Option<VideoId> {
        self.get(id_column)
            .map(VideoId::from_string)
            .filter(|id| !id.is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnnotationRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_trims_and_filters_blank() {
        let record = AnnotationRecord::new().with("video_id", " 7301 ");
        assert_eq!(record.video_id("video_id"), Some(VideoId::from("7301")));

        let blank = AnnotationRecord::new().with("video_id", "  ");
        assert_eq!(blank.video_id("video_id"), None);
        assert_eq!(blank.video_id("id"), None);
    }

    #[test]
    fn test_record_from_iter() {
        let record: AnnotationRecord = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(record.get("b"), Some("2"));
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
