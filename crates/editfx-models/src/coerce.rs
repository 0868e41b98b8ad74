//! Default coercion of raw cell text into canonical field shapes.
//!
//! Cells may be missing, blank, or hold values of the wrong type. None of
//! these helpers fail; they fall back to the field's empty default.

use crate::literal::{parse_sequence, scalar_text, SequenceParse};

/// Strict truthy parse: case-insensitive `true`, `1`, `yes`, `y`.
pub fn truthy(raw: Option<&str>) -> bool {
    raw.map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y"))
        .unwrap_or(false)
}

/// Lenient boolean parse: [`truthy`] plus `t`.
pub fn lenient_bool(raw: Option<&str>) -> bool {
    raw.map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y" | "t"))
        .unwrap_or(false)
}

/// Integer parse that also accepts float text (truncated), default 0.
pub fn lenient_int(raw: Option<&str>) -> i64 {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    if let Ok(value) = s.parse::<i64>() {
        return value;
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
        .unwrap_or(0)
}

/// Float parse, default 0.0.
pub fn lenient_float(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Normalize a multi-valued cell into a set of trimmed strings.
///
/// Accepts a serialized list (JSON or literal), or a comma-separated string.
/// Blank entries are dropped and duplicates collapse onto their first
/// occurrence.
pub fn normalize_list(raw: Option<&str>) -> Vec<String> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    let items: Vec<String> = match parse_sequence(s) {
        SequenceParse::Sequence(values) => values.iter().map(scalar_text).collect(),
        SequenceParse::Unparsable => s.split(',').map(str::to_string).collect(),
    };

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Serialize a list for a dataset cell: `A, B, C`, or blank when empty.
pub fn to_list_cell(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy() {
        for raw in ["TRUE", "true", " 1 ", "Yes", "y"] {
            assert!(truthy(Some(raw)), "{raw} should be truthy");
        }
        for raw in ["false", "0", "t", "", "maybe"] {
            assert!(!truthy(Some(raw)), "{raw} should not be truthy");
        }
        assert!(!truthy(None));
    }

    #[test]
    fn test_lenient_bool_accepts_t() {
        assert!(lenient_bool(Some("T")));
        assert!(!lenient_bool(Some("f")));
    }

    #[test]
    fn test_lenient_int() {
        assert_eq!(lenient_int(Some("3")), 3);
        assert_eq!(lenient_int(Some("2.0")), 2);
        assert_eq!(lenient_int(Some("6.9")), 6);
        assert_eq!(lenient_int(Some("")), 0);
        assert_eq!(lenient_int(Some("many")), 0);
        assert_eq!(lenient_int(Some("nan")), 0);
        assert_eq!(lenient_int(None), 0);
    }

    #[test]
    fn test_normalize_list_shapes() {
        let expected = vec!["Transcript".to_string(), "Hook".to_string()];
        assert_eq!(normalize_list(Some(r#"["Transcript", "Hook"]"#)), expected);
        assert_eq!(normalize_list(Some("['Transcript', 'Hook']")), expected);
        assert_eq!(normalize_list(Some("Transcript, Hook, ")), expected);
        assert_eq!(normalize_list(Some("Transcript,Hook,Transcript")), expected);
        assert!(normalize_list(Some("[]")).is_empty());
        assert!(normalize_list(Some("  ")).is_empty());
        assert!(normalize_list(None).is_empty());
    }

    #[test]
    fn test_to_list_cell() {
        let items = vec!["video".to_string(), " image ".to_string(), String::new()];
        assert_eq!(to_list_cell(&items), "video, image");
        assert_eq!(to_list_cell(&[]), "");
    }
}
