//! Typed structured-annotation schema.
//!
//! [`VideoEditAnalysis`] is the shape the external annotation service is
//! asked to return for each video. The dataset stores the same fields as
//! flat cells; [`validate`] checks an edited record against this shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::FieldValues;
use crate::vocabulary::{
    AnimatedGraphicsType, BrollType, CameraAngle, Category, OverallType, PlaybackSpeed, TextType,
    TransitionType,
};

/// Structured editing-effect annotation for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoEditAnalysis {
    /// Short summary of the video content, excluding editing effects
    pub video_summary: String,
    pub category: Category,
    pub overall_type: OverallType,
    pub camera_angles: CameraAngle,

    /// Hard cuts or scene changes occur
    pub shot_or_scene_changes_present: bool,
    pub average_interval_shot_or_scene_changes_seconds: f64,
    pub shot_or_scene_change_count: u32,

    /// Stock footage or imagery differing from the main A-roll
    pub b_roll_footage_present: bool,
    pub b_roll_visuals: Vec<BrollType>,
    pub b_roll_count: u32,

    /// Stickers, memes or GIFs; text overlays are not animated graphics
    pub animated_graphics_present: bool,
    pub types_of_animated_graphics: Vec<AnimatedGraphicsType>,
    pub animated_graphics_count: u32,

    pub on_screen_text_present: bool,
    pub type_of_on_screen_text: Vec<TextType>,

    pub transitions_present: bool,
    pub types_of_transitions: Vec<TransitionType>,
    pub transitions_count: u32,

    pub voiceover_present: bool,
    pub voiceover_type: String,

    pub playback_speed: PlaybackSpeed,
    pub background_music_present: bool,

    pub sound_effects_present: bool,
    pub sound_effects_type: String,
    pub sound_effects_count: u32,
}

impl VideoEditAnalysis {
    /// JSON Schema for the annotation contract.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(VideoEditAnalysis)
    }
}

/// Check that `values` coerces into [`VideoEditAnalysis`].
///
/// Returns a warning message on failure. Failure never blocks persistence;
/// the reviewer's input is saved as entered.
pub fn validate(values: &FieldValues) -> Option<String> {
    match serde_json::from_value::<VideoEditAnalysis>(values.to_json()) {
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnnotationRecord;

    fn complete_record() -> AnnotationRecord {
        [
            ("video_summary", "A chef plates a dessert"),
            ("category", "FOOD"),
            ("overall_type", "How-to"),
            ("camera_angles", "Multiple Static Angle"),
            ("shot_or_scene_changes_present", "True"),
            ("average_interval_shot_or_scene_changes_seconds", "3.0"),
            ("shot_or_scene_change_count", "4"),
            ("b_roll_footage_present", "False"),
            ("animated_graphics_present", "False"),
            ("on_screen_text_present", "True"),
            ("type_of_on_screen_text", "HOOK, Call to Action"),
            ("transitions_present", "False"),
            ("voiceover_present", "True"),
            ("voiceover_type", "narration"),
            ("playback_speed", "NORMAL"),
            ("background_music_present", "True"),
            ("sound_effects_present", "False"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_validate_accepts_names_and_values() {
        let values = FieldValues::from_record(&complete_record());
        assert_eq!(validate(&values), None);
    }

    #[test]
    fn test_validate_reports_unknown_vocabulary() {
        let record = complete_record().with("playback_speed", "Warp");
        let warning = validate(&FieldValues::from_record(&record)).unwrap();
        assert!(warning.contains("PlaybackSpeed"), "{warning}");
    }

    #[test]
    fn test_validate_reports_missing_choice() {
        let record = complete_record().with("category", "");
        assert!(validate(&FieldValues::from_record(&record)).is_some());
    }

    #[test]
    fn test_schema_lists_vocabulary_values() {
        let schema = serde_json::to_string(&VideoEditAnalysis::json_schema()).unwrap();
        assert!(schema.contains("Single Static Angle"));
        assert!(schema.contains("sound_effects_count"));
    }
}
