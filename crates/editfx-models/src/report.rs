//! Diagnostic report and audit log entry types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::VideoId;
use crate::schema::FieldValue;

/// Predicted vs. observed value for one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MismatchValue {
    /// `(predicted count, start markers found)`
    Count(i64, usize),
    /// `(predicted presence, marker found)`
    Presence(bool, bool),
}

impl fmt::Display for MismatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchValue::Count(predicted, observed) => write!(f, "({}, {})", predicted, observed),
            MismatchValue::Presence(predicted, observed) => {
                write!(f, "({}, {})", predicted, observed)
            }
        }
    }
}

/// Effects of one record whose structured prediction disagrees with the
/// markers in its narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchReport {
    pub video_id: VideoId,
    #[serde(flatten)]
    pub mismatches: BTreeMap<String, MismatchValue>,
}

impl MismatchReport {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            mismatches: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn get(&self, effect: &str) -> Option<MismatchValue> {
        self.mismatches.get(effect).copied()
    }
}

/// Heuristic rule outcomes for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyEntry {
    pub video_id: VideoId,
    pub rule_sound_and_bgm: bool,
    pub rule_overuse_counts: bool,
    pub rule_text_conflict: bool,
    pub has_anomaly: bool,
    /// Human-readable reasons joined with `"; "`
    pub anomalies_joined: String,
}

/// Old and new value of one edited field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Append-only audit entry for one reconciled record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub video_id: VideoId,
    pub reviewed_at: DateTime<Utc>,
    pub changes: BTreeMap<String, FieldChange>,
}

impl ChangeLogEntry {
    pub fn new(video_id: VideoId) -> Self {
        Self {
            video_id,
            reviewed_at: Utc::now(),
            changes: BTreeMap::new(),
        }
    }

    /// Record a change. Repeated changes to one field keep the first `old`.
    pub fn record(&mut self, field: &str, old: FieldValue, new: FieldValue) {
        match self.changes.get_mut(field) {
            Some(existing) => existing.new = new,
            None => {
                self.changes.insert(field.to_string(), FieldChange { old, new });
            }
        }
    }

    /// Drop entries whose final value equals the original.
    pub fn prune_noops(&mut self) {
        self.changes.retain(|_, change| change.old != change.new);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
