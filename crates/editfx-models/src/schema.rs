//! Annotation field schema and the presence-flag dependency graph.
//!
//! Each presence flag gates a set of dependent fields. Whenever a flag is
//! false, all of its dependents must hold their empty value (0 for counts,
//! 0.0 for floats, empty for lists and strings).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_bool, lenient_float, lenient_int, normalize_list, to_list_cell};
use crate::record::AnnotationRecord;
use crate::vocabulary::VocabularyKind;

/// Canonical shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    Choice(VocabularyKind),
    ChoiceList(VocabularyKind),
}

impl FieldKind {
    /// The value a field of this shape holds when cleared.
    pub fn empty_value(self) -> FieldValue {
        match self {
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Int => FieldValue::Int(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Text | FieldKind::Choice(_) => FieldValue::Text(String::new()),
            FieldKind::ChoiceList(_) => FieldValue::List(Vec::new()),
        }
    }
}

/// A named field of the annotation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn spec(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Every annotation field, in schema order.
pub const FIELDS: &[FieldSpec] = &[
    spec("video_summary", FieldKind::Text),
    spec("category", FieldKind::Choice(VocabularyKind::Category)),
    spec("overall_type", FieldKind::Choice(VocabularyKind::OverallType)),
    spec("camera_angles", FieldKind::Choice(VocabularyKind::CameraAngle)),
    spec("shot_or_scene_changes_present", FieldKind::Bool),
    spec("average_interval_shot_or_scene_changes_seconds", FieldKind::Float),
    spec("shot_or_scene_change_count", FieldKind::Int),
    spec("b_roll_footage_present", FieldKind::Bool),
    spec("b_roll_visuals", FieldKind::ChoiceList(VocabularyKind::BrollType)),
    spec("b_roll_count", FieldKind::Int),
    spec("animated_graphics_present", FieldKind::Bool),
    spec(
        "types_of_animated_graphics",
        FieldKind::ChoiceList(VocabularyKind::AnimatedGraphicsType),
    ),
    spec("animated_graphics_count", FieldKind::Int),
    spec("on_screen_text_present", FieldKind::Bool),
    spec("type_of_on_screen_text", FieldKind::ChoiceList(VocabularyKind::TextType)),
    spec("transitions_present", FieldKind::Bool),
    spec("types_of_transitions", FieldKind::ChoiceList(VocabularyKind::Transition)),
    spec("transitions_count", FieldKind::Int),
    spec("voiceover_present", FieldKind::Bool),
    spec("voiceover_type", FieldKind::Text),
    spec("playback_speed", FieldKind::Choice(VocabularyKind::PlaybackSpeed)),
    spec("background_music_present", FieldKind::Bool),
    spec("sound_effects_present", FieldKind::Bool),
    spec("sound_effects_type", FieldKind::Text),
    spec("sound_effects_count", FieldKind::Int),
];

/// Presence flag to the fields it gates, in prompt order.
pub const DEPENDENCY_GRAPH: &[(&str, &[&str])] = &[
    (
        "shot_or_scene_changes_present",
        &[
            "shot_or_scene_change_count",
            "average_interval_shot_or_scene_changes_seconds",
        ],
    ),
    ("b_roll_footage_present", &["b_roll_count", "b_roll_visuals"]),
    (
        "animated_graphics_present",
        &["animated_graphics_count", "types_of_animated_graphics"],
    ),
    ("on_screen_text_present", &["type_of_on_screen_text"]),
    ("transitions_present", &["transitions_count", "types_of_transitions"]),
    ("voiceover_present", &["voiceover_type"]),
    ("background_music_present", &[]),
    ("sound_effects_present", &["sound_effects_count", "sound_effects_type"]),
];

/// Look up a field by name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Presence flags, in prompt order.
pub fn presence_flags() -> impl Iterator<Item = &'static str> {
    DEPENDENCY_GRAPH.iter().map(|(flag, _)| *flag)
}

/// Fields gated by `flag` (empty for unknown flags).
pub fn dependents(flag: &str) -> &'static [&'static str] {
    DEPENDENCY_GRAPH
        .iter()
        .find(|(f, _)| *f == flag)
        .map(|(_, deps)| *deps)
        .unwrap_or(&[])
}

/// The presence flag gating `field`, if any.
pub fn governing_flag(field: &str) -> Option<&'static str> {
    DEPENDENCY_GRAPH
        .iter()
        .find(|(_, deps)| deps.contains(&field))
        .map(|(flag, _)| *flag)
}

/// A coerced field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True for `false`, zero, and empty strings or lists.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            FieldValue::List(items) => items,
            _ => &[],
        }
    }

    fn to_json(&self, kind: FieldKind) -> serde_json::Value {
        match (self, kind) {
            (FieldValue::Text(s), FieldKind::Choice(_)) if s.trim().is_empty() => {
                serde_json::Value::Null
            }
            _ => serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{:?}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Coerce a raw cell into the canonical shape for `kind`.
pub fn coerce_cell(kind: FieldKind, raw: Option<&str>) -> FieldValue {
    match kind {
        FieldKind::Bool => FieldValue::Bool(lenient_bool(raw)),
        FieldKind::Int => FieldValue::Int(lenient_int(raw)),
        FieldKind::Float => FieldValue::Float(lenient_float(raw)),
        FieldKind::Text | FieldKind::Choice(_) => {
            FieldValue::Text(raw.map(str::trim).unwrap_or_default().to_string())
        }
        FieldKind::ChoiceList(_) => FieldValue::List(normalize_list(raw)),
    }
}

/// Render a value back into cell text, canonicalizing vocabulary entries.
pub fn render_cell(kind: FieldKind, value: &FieldValue) -> String {
    match (kind, value) {
        (_, FieldValue::Bool(b)) => String::from(if *b { "True" } else { "False" }),
        (_, FieldValue::Int(i)) => i.to_string(),
        (_, FieldValue::Float(x)) => format!("{:?}", x),
        (FieldKind::Choice(vocab), FieldValue::Text(s)) => {
            vocab.canonical(s).map(str::to_string).unwrap_or_else(|| s.clone())
        }
        (_, FieldValue::Text(s)) => s.clone(),
        (FieldKind::ChoiceList(vocab), FieldValue::List(items)) => {
            let canonical: Vec<String> = items
                .iter()
                .map(|item| vocab.canonical(item).map(str::to_string).unwrap_or_else(|| item.clone()))
                .collect();
            to_list_cell(&canonical)
        }
        (_, FieldValue::List(items)) => to_list_cell(items),
    }
}

/// The schema fields of one record, coerced to their canonical shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    values: BTreeMap<String, FieldValue>,
}

impl FieldValues {
    /// Coerce every schema field of `record`; missing cells take defaults.
    pub fn from_record(record: &AnnotationRecord) -> Self {
        let values = FIELDS
            .iter()
            .map(|f| (f.name.to_string(), coerce_cell(f.kind, record.get(f.name))))
            .collect();
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Replace a value, returning the previous one.
    pub fn set(&mut self, field: &str, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(field.to_string(), value)
    }

    /// Current value of a presence flag (false when absent).
    pub fn flag(&self, field: &str) -> bool {
        self.get(field).map(FieldValue::as_bool).unwrap_or(false)
    }

    /// Write the named schema fields back into `record` in canonical cell
    /// form. Other cells keep their original text.
    pub fn write_into<'a>(&self, record: &mut AnnotationRecord, fields: impl IntoIterator<Item = &'a str>) {
        for name in fields {
            let (Some(spec), Some(value)) = (field(name), self.values.get(name)) else {
                continue;
            };
            record.set(spec.name, render_cell(spec.kind, value));
        }
    }

    /// JSON object form, for schema validation.
    pub fn to_json(&self) -> serde_json::Value {
        let map = FIELDS
            .iter()
            .filter_map(|f| self.values.get(f.name).map(|v| (f.name.to_string(), v.to_json(f.kind))))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Clear the dependents of `flag` when `new_value` is false.
///
/// Returns the fields whose value actually changed, with their old values.
pub fn apply_dependency_clear(
    values: &mut FieldValues,
    flag: &str,
    new_value: bool,
) -> Vec<(&'static str, FieldValue)> {
    if new_value {
        return Vec::new();
    }

    let mut cleared = Vec::new();
    for dep in dependents(flag) {
        let Some(spec) = field(dep) else { continue };
        let empty = spec.kind.empty_value();
        if values.get(dep) != Some(&empty) {
            if let Some(old) = values.set(dep, empty) {
                cleared.push((spec.name, old));
            }
        }
    }
    cleared
}

/// Apply [`apply_dependency_clear`] for every flag that is currently false.
pub fn enforce_dependencies(values: &mut FieldValues) -> Vec<(&'static str, FieldValue)> {
    let mut cleared = Vec::new();
    for flag in presence_flags() {
        let current = values.flag(flag);
        cleared.extend(apply_dependency_clear(values, flag, current));
    }
    cleared
}

/// `(flag, dependent)` pairs that break the dependency invariant.
pub fn dependency_violations(values: &FieldValues) -> Vec<(&'static str, &'static str)> {
    let mut violations = Vec::new();
    for (flag, deps) in DEPENDENCY_GRAPH {
        if values.flag(flag) {
            continue;
        }
        for dep in deps.iter() {
            if values.get(dep).is_some_and(|v| !v.is_empty()) {
                violations.push((*flag, *dep));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AnnotationRecord {
        AnnotationRecord::new()
            .with("video_id", "v1")
            .with("b_roll_footage_present", "TRUE")
            .with("b_roll_count", "2")
            .with("b_roll_visuals", "['VIDEO', 'image']")
            .with("sound_effects_present", "False")
            .with("sound_effects_count", "3")
            .with("sound_effects_type", "whoosh")
            .with("camera_angles", "DYNAMIC")
            .with("shot_or_scene_changes_present", "yes")
            .with("average_interval_shot_or_scene_changes_seconds", "2.5")
    }

    #[test]
    fn test_every_dependent_is_a_schema_field() {
        for (flag, deps) in DEPENDENCY_GRAPH {
            assert_eq!(field(flag).map(|f| f.kind), Some(FieldKind::Bool));
            for dep in deps.iter() {
                assert!(field(dep).is_some(), "{dep} missing from schema");
                assert_eq!(governing_flag(dep), Some(*flag));
            }
        }
        assert_eq!(FIELDS.len(), 25);
        assert_eq!(presence_flags().count(), 8);
    }

    #[test]
    fn test_from_record_coerces() {
        let values = FieldValues::from_record(&sample_record());
        assert!(values.flag("b_roll_footage_present"));
        assert_eq!(values.get("b_roll_count"), Some(&FieldValue::Int(2)));
        assert_eq!(
            values.get("b_roll_visuals"),
            Some(&FieldValue::List(vec!["VIDEO".into(), "image".into()]))
        );
        assert_eq!(values.get("transitions_count"), Some(&FieldValue::Int(0)));
        assert_eq!(values.get("voiceover_type"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_apply_dependency_clear() {
        let mut values = FieldValues::from_record(&sample_record());
        let cleared = apply_dependency_clear(&mut values, "b_roll_footage_present", false);
        let names: Vec<_> = cleared.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["b_roll_count", "b_roll_visuals"]);
        assert_eq!(values.get("b_roll_count"), Some(&FieldValue::Int(0)));
        assert_eq!(values.get("b_roll_visuals"), Some(&FieldValue::List(vec![])));

        // Setting a flag true never touches dependents.
        let mut values = FieldValues::from_record(&sample_record());
        assert!(apply_dependency_clear(&mut values, "b_roll_footage_present", true).is_empty());
        assert_eq!(values.get("b_roll_count"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn test_enforce_dependencies_clears_inconsistent_rows() {
        let mut values = FieldValues::from_record(&sample_record());
        assert_eq!(
            dependency_violations(&values),
            vec![
                ("sound_effects_present", "sound_effects_count"),
                ("sound_effects_present", "sound_effects_type"),
            ]
        );

        let cleared = enforce_dependencies(&mut values);
        assert_eq!(cleared.len(), 2);
        assert!(dependency_violations(&values).is_empty());
        assert_eq!(values.get("sound_effects_type"), Some(&FieldValue::Text(String::new())));
    }

    #[test]
    fn test_write_into_canonicalizes() {
        let mut record = sample_record().with("extra_column", "kept");
        let values = FieldValues::from_record(&record);
        values.write_into(&mut record, FIELDS.iter().map(|f| f.name));

        assert_eq!(record.get("b_roll_footage_present"), Some("True"));
        assert_eq!(record.get("b_roll_visuals"), Some("video, image"));
        assert_eq!(record.get("camera_angles"), Some("Dynamic Camera Movement"));
        assert_eq!(record.get("average_interval_shot_or_scene_changes_seconds"), Some("2.5"));
        assert_eq!(record.get("transitions_count"), Some("0"));
        assert_eq!(record.get("extra_column"), Some("kept"));
    }

    #[test]
    fn test_write_into_leaves_unnamed_cells() {
        let mut record = sample_record()
            .with("transitions_count", "several")
            .with("b_roll_count", "2");
        let mut values = FieldValues::from_record(&record);
        values.set("b_roll_count", FieldValue::Int(4));
        values.write_into(&mut record, ["b_roll_count", "extra_column"]);

        assert_eq!(record.get("b_roll_count"), Some("4"));
        assert_eq!(record.get("transitions_count"), Some("several"));
        assert_eq!(record.get("b_roll_footage_present"), Some("TRUE"));
        assert_eq!(record.get("extra_column"), None);
    }
}
