//! Cross-check of structured predictions against narrative markers.
//!
//! Read-only: records are never modified here.

use tracing::debug;

use editfx_models::coerce::{lenient_int, truthy};
use editfx_models::{AnnotationRecord, MismatchReport, MismatchValue, VideoId};

use crate::markers::{count_start_tags, extract_full_text, tag_present, Marker, Prediction, EFFECTS};

/// Column holding the narrative with inline markers.
pub const NARRATIVE_COLUMN: &str = "edited_script";

/// Older datasets used a space instead of an underscore.
pub const LEGACY_NARRATIVE_COLUMN: &str = "edited script";

/// Raw narrative cell of a record, preferring [`NARRATIVE_COLUMN`].
pub fn narrative_of(record: &AnnotationRecord) -> &str {
    record
        .get(NARRATIVE_COLUMN)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| record.get(LEGACY_NARRATIVE_COLUMN))
        .unwrap_or("")
}

/// Compare one record's predictions with markers found in `text`.
///
/// `text` is the already-extracted searchable narrative.
pub fn check_record(record: &AnnotationRecord, video_id: VideoId, text: &str) -> MismatchReport {
    let mut report = MismatchReport::new(video_id);

    for effect in EFFECTS {
        let value = match effect.prediction {
            Prediction::Count(column) => {
                let predicted = lenient_int(record.get(column));
                let observed = count_start_tags(text, effect.marker.opening());
                (predicted != observed as i64).then_some(MismatchValue::Count(predicted, observed))
            }
            Prediction::Presence(column) => {
                let predicted = truthy(record.get(column));
                let observed = match effect.marker {
                    Marker::Single(tag) => tag_present(text, tag),
                    Marker::Paired { start, .. } => count_start_tags(text, start) > 0,
                };
                (predicted != observed).then_some(MismatchValue::Presence(predicted, observed))
            }
        };

        if let Some(value) = value {
            report.mismatches.insert(effect.key.to_string(), value);
        }
    }

    report
}

/// Check every record, keeping only those with at least one mismatch.
///
/// Records without an id under `id_column` are reported as `row_{index}`.
pub fn check_records(records: &[AnnotationRecord], id_column: Option<&str>) -> Vec<MismatchReport> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let video_id = id_column
                .and_then(|col| record.video_id(col))
                .unwrap_or_else(|| VideoId::from(format!("row_{}", idx)));
            let text = extract_full_text(narrative_of(record));
            debug!(video_id = %video_id, text_len = text.len(), "Checking markers");

            let report = check_record(record, video_id, &text);
            (!report.is_empty()).then_some(report)
        })
        .collect()
}
