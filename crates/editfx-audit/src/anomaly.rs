//! Heuristic anomaly rules over structured annotation fields.
//!
//! Three independent rules; a record is flagged when any of them fires.
//! The narrative text is not consulted.

use std::collections::HashSet;

use editfx_models::coerce::{lenient_bool, lenient_int, normalize_list};
use editfx_models::{AnnotationRecord, AnomalyEntry, VideoId};

/// Counts above this value are treated as overuse.
pub const OVERUSE_THRESHOLD: i64 = 5;

/// Count fields checked for overuse, in report order.
pub const OVERUSE_FIELDS: &[&str] = &[
    "b_roll_count",
    "animated_graphics_count",
    "transitions_count",
    "sound_effects_count",
];

const TRANSCRIPT_TERMS: &[&str] = &["transcript", "text on screen", "text-on-screen"];

/// Evaluate every rule for one record.
pub fn detect(record: &AnnotationRecord, video_id: VideoId) -> AnomalyEntry {
    let mut reasons: Vec<String> = Vec::new();

    // R1: background music and sound effects rarely co-occur.
    let rule_sound_and_bgm = lenient_bool(record.get("background_music_present"))
        && lenient_bool(record.get("sound_effects_present"));
    if rule_sound_and_bgm {
        reasons.push("Both sound effects and background music are present".to_string());
    }

    // R2: implausibly many edits of one kind.
    let overused: Vec<String> = OVERUSE_FIELDS
        .iter()
        .filter_map(|field| {
            let count = lenient_int(record.get(field));
            (count > OVERUSE_THRESHOLD).then(|| format!("{}={}", field, count))
        })
        .collect();
    let rule_overuse_counts = !overused.is_empty();
    if rule_overuse_counts {
        reasons.push(format!(
            "High edit counts (>{}): {}",
            OVERUSE_THRESHOLD,
            overused.join(", ")
        ));
    }

    // R3: a transcript mislabeled as specific keywords.
    let text_types: HashSet<String> = normalize_list(record.get("type_of_on_screen_text"))
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect();
    let has_transcript = text_types.iter().any(|t| TRANSCRIPT_TERMS.contains(&t.as_str()));
    let has_keywords = text_types
        .iter()
        .any(|t| (t.contains("specific") && t.contains("keyword")) || t == "specific keywords");
    let rule_text_conflict = has_transcript && has_keywords;
    if rule_text_conflict {
        reasons.push("Both Transcript/Text-on-screen and Specific Keywords are present".to_string());
    }

    AnomalyEntry {
        video_id,
        rule_sound_and_bgm,
        rule_overuse_counts,
        rule_text_conflict,
        has_anomaly: rule_sound_and_bgm || rule_overuse_counts || rule_text_conflict,
        anomalies_joined: reasons.join("; "),
    }
}

/// Run the rules over every record, keeping flagged entries only.
///
/// Records are identified by `id_column`, or by row index when the dataset
/// has no id column.
pub fn detect_all(records: &[AnnotationRecord], id_column: Option<&str>) -> Vec<AnomalyEntry> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let video_id = id_column
                .map(|col| VideoId::from_string(record.get(col).unwrap_or_default()))
                .unwrap_or_else(|| VideoId::from(idx.to_string()));
            detect(record, video_id)
        })
        .filter(|entry| entry.has_anomaly)
        .collect()
}
