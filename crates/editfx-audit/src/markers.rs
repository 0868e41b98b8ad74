//! Literal effect markers and narrative text extraction.
//!
//! Markers are matched as literal substrings. Tag text is opaque: brackets,
//! slashes or any other pattern metacharacters carry no special meaning.

use serde_json::Value;

use editfx_models::literal::{parse_value, scalar_text};

/// How an effect is marked in narrative text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Opening and closing tags around a span. Only openings are counted.
    Paired {
        start: &'static str,
        end: &'static str,
    },
    /// A single point tag.
    Single(&'static str),
}

impl Marker {
    /// The tag whose occurrences define presence and count.
    pub fn opening(&self) -> &'static str {
        match self {
            Marker::Paired { start, .. } => start,
            Marker::Single(tag) => tag,
        }
    }
}

/// What the structured annotation predicts for an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    /// An integer count column.
    Count(&'static str),
    /// A boolean presence column.
    Presence(&'static str),
}

impl Prediction {
    pub fn column(&self) -> &'static str {
        match self {
            Prediction::Count(column) | Prediction::Presence(column) => column,
        }
    }
}

/// One effect type: its report key, marker, and predicting column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectDefinition {
    pub key: &'static str,
    pub marker: Marker,
    pub prediction: Prediction,
}

/// Effects cross-checked between structured predictions and narrative markers.
pub const EFFECTS: &[EffectDefinition] = &[
    EffectDefinition {
        key: "b_roll",
        marker: Marker::Paired {
            start: "[BROLL]",
            end: "[/BROLL]",
        },
        prediction: Prediction::Count("b_roll_count"),
    },
    EffectDefinition {
        key: "animated",
        marker: Marker::Paired {
            start: "[ANIMATED]",
            end: "[/ANIMATED]",
        },
        prediction: Prediction::Count("animated_graphics_count"),
    },
    EffectDefinition {
        key: "tos",
        marker: Marker::Paired {
            start: "[TOS]",
            end: "[/TOS]",
        },
        prediction: Prediction::Presence("on_screen_text_present"),
    },
    EffectDefinition {
        key: "transition",
        marker: Marker::Single("[TRANSITION]"),
        prediction: Prediction::Presence("transitions_present"),
    },
    EffectDefinition {
        key: "sound_effect",
        marker: Marker::Paired {
            start: "[SOUND_EFFECT]",
            end: "[/SOUND_EFFECT]",
        },
        prediction: Prediction::Presence("sound_effects_present"),
    },
    // Some narratives leave the music span unclosed; presence comes from the
    // opening tag alone.
    EffectDefinition {
        key: "background_music",
        marker: Marker::Paired {
            start: "[BACKGROUND_MUSIC]",
            end: "[/BACKGROUND_MUSIC]",
        },
        prediction: Prediction::Presence("background_music_present"),
    },
];

/// Look up an effect definition by report key.
pub fn effect(key: &str) -> Option<&'static EffectDefinition> {
    EFFECTS.iter().find(|e| e.key == key)
}

/// Count non-overlapping literal occurrences of `start_tag`.
pub fn count_start_tags(text: &str, start_tag: &str) -> usize {
    if text.is_empty() || start_tag.is_empty() {
        return 0;
    }
    text.matches(start_tag).count()
}

/// True iff `tag` occurs literally at least once.
pub fn tag_present(text: &str, tag: &str) -> bool {
    !text.is_empty() && !tag.is_empty() && text.contains(tag)
}

/// Join a serialized narrative into one searchable string.
///
/// Accepts a list of segment objects or an object wrapping that list under
/// `segments`, in JSON or literal encoding. For each segment the transcript
/// then the visual description are appended (when present and non-empty);
/// everything is space-joined. Unparsable input yields an empty string.
pub fn extract_full_text(narrative: &str) -> String {
    let Some(parsed) = parse_value(narrative) else {
        return String::new();
    };

    let segments = match parsed {
        Value::Object(mut map) if map.contains_key("segments") => {
            map.remove("segments").unwrap_or(Value::Null)
        }
        other => other,
    };

    let Value::Array(segments) = segments else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for segment in &segments {
        let Value::Object(fields) = segment else {
            continue;
        };
        for key in ["transcript", "visualDescription"] {
            if let Some(value) = fields.get(key).filter(|v| is_present(v)) {
                parts.push(scalar_text(value));
            }
        }
    }
    parts.join(" ").trim().to_string()
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_start_tags_ignores_end_tags() {
        let text = "[BROLL] a [/BROLL] b [BROLL] c";
        assert_eq!(count_start_tags(text, "[BROLL]"), 2);
        assert_eq!(count_start_tags(text, "[/BROLL]"), 1);
        assert_eq!(count_start_tags("", "[BROLL]"), 0);
        assert_eq!(count_start_tags(text, ""), 0);
    }

    #[test]
    fn test_count_is_literal_and_non_overlapping() {
        // Metacharacters are plain text.
        assert_eq!(count_start_tags("a.*b a.*b axb", ".*"), 2);
        assert_eq!(count_start_tags("[TOS][TOS]", "[TOS]"), 2);
        assert_eq!(count_start_tags("aaaa", "aa"), 2);
    }

    #[test]
    fn test_tag_present() {
        assert!(tag_present("x [TRANSITION] y", "[TRANSITION]"));
        assert!(!tag_present("x [TRANSITION y", "[TRANSITION]"));
        assert!(!tag_present("", "[TRANSITION]"));
    }

    #[test]
    fn test_extract_full_text_reads_byte_escapes() {
        let narrative = r"[{'transcript': 'hello\xa0world [BROLL]', 'visualDescription': 'cut'}]";
        assert_eq!(extract_full_text(narrative), "hello\u{a0}world [BROLL] cut");
    }

    #[test]
    fn test_extract_full_text_list_and_wrapper() {
        let list = r#"[{"transcript": "a", "visualDescription": "b", "startTimestamp": "00:00"}]"#;
        let wrapped = r#"{"segments": [{"transcript": "a", "visualDescription": "b"}]}"#;
        assert_eq!(extract_full_text(list), "a b");
        assert_eq!(extract_full_text(wrapped), "a b");
    }

    #[test]
    fn test_extract_full_text_literal_encoding() {
        let narrative = "[{'transcript': 'hello [BROLL]', 'visualDescription': ''}, \
                         {'transcript': None, 'visualDescription': 'it\\'s a cut'}]";
        assert_eq!(extract_full_text(narrative), "hello [BROLL] it's a cut");
    }

    #[test]
    fn test_extract_full_text_stringifies_scalars() {
        let narrative = r#"[{"transcript": 42, "visualDescription": "frames"}]"#;
        assert_eq!(extract_full_text(narrative), "42 frames");
    }

    #[test]
    fn test_extract_full_text_unparsable() {
        assert_eq!(extract_full_text("not a narrative"), "");
        assert_eq!(extract_full_text(""), "");
        assert_eq!(extract_full_text(r#"{"text": "x"}"#), "");
        assert_eq!(extract_full_text("[{'transcript': 'open"), "");
    }

    #[test]
    fn test_every_effect_opening_is_distinct() {
        for (i, a) in EFFECTS.iter().enumerate() {
            for b in &EFFECTS[i + 1..] {
                assert_ne!(a.marker.opening(), b.marker.opening());
            }
        }
        assert_eq!(effect("transition").map(|e| e.marker), Some(Marker::Single("[TRANSITION]")));
    }
}
