//! Per-field prompts and input parsing.

use editfx_models::{FieldKind, FieldSpec, FieldValue, VocabularyKind};

use crate::port::ReviewPort;

/// Result of interpreting one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Empty input; the current value stays.
    Keep,
    Set(FieldValue),
    /// Input not understood; the current value stays.
    Invalid(String),
}

/// Prompt text for a field, showing its current value.
pub fn prompt_text(spec: &FieldSpec, current: &FieldValue) -> String {
    let hint = match spec.kind {
        FieldKind::Bool => "y/n, Enter=keep".to_string(),
        FieldKind::Int => "int, Enter=keep".to_string(),
        FieldKind::Float => "float, Enter=keep".to_string(),
        FieldKind::Text => "Enter=keep".to_string(),
        FieldKind::Choice(vocab) => format!("choose by NAME; {}; Enter=keep", vocab.names()),
        FieldKind::ChoiceList(vocab) => {
            format!("comma-separated NAMES; {}; Enter=keep", vocab.names())
        }
    };
    format!("{} [current={}] ({}): ", spec.name, current, hint)
}

fn parse_choice_list(vocab: VocabularyKind, input: &str) -> (Vec<String>, Vec<String>) {
    let mut valid: Vec<String> = Vec::new();
    let mut ignored = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match vocab.canonical(part) {
            Some(value) if !valid.iter().any(|v| v == value) => valid.push(value.to_string()),
            Some(_) => {}
            None => ignored.push(part.to_string()),
        }
    }
    (valid, ignored)
}

/// Interpret raw operator input for a field of `kind`.
pub fn parse_answer(kind: FieldKind, input: &str) -> Answer {
    let input = input.trim();
    if input.is_empty() {
        return Answer::Keep;
    }

    match kind {
        FieldKind::Bool => match input.to_lowercase().as_str() {
            "y" | "yes" => Answer::Set(FieldValue::Bool(true)),
            "n" | "no" => Answer::Set(FieldValue::Bool(false)),
            _ => Answer::Invalid("not understood".to_string()),
        },
        FieldKind::Int => match input.parse::<i64>() {
            Ok(n) => Answer::Set(FieldValue::Int(n)),
            Err(_) => Answer::Invalid("invalid int".to_string()),
        },
        FieldKind::Float => match input.parse::<f64>() {
            Ok(x) if x.is_finite() => Answer::Set(FieldValue::Float(x)),
            _ => Answer::Invalid("invalid float".to_string()),
        },
        FieldKind::Text => Answer::Set(FieldValue::Text(input.to_string())),
        FieldKind::Choice(vocab) => match vocab.canonical(input) {
            Some(value) => Answer::Set(FieldValue::Text(value.to_string())),
            None => Answer::Invalid("invalid name".to_string()),
        },
        FieldKind::ChoiceList(vocab) => {
            let (valid, ignored) = parse_choice_list(vocab, input);
            // Partial lists are accepted; the caller reports what was dropped.
            if valid.is_empty() {
                Answer::Invalid(format!("no valid names in: {}", ignored.join(", ")))
            } else {
                Answer::Set(FieldValue::List(valid))
            }
        }
    }
}

/// Ask for one field. Returns the new value only when it differs from `current`.
pub fn prompt_field<P: ReviewPort + ?Sized>(
    port: &mut P,
    spec: &FieldSpec,
    current: &FieldValue,
) -> std::io::Result<Option<FieldValue>> {
    let raw = port.ask(&prompt_text(spec, current))?;

    if let FieldKind::ChoiceList(vocab) = spec.kind {
        let (_, ignored) = parse_choice_list(vocab, &raw);
        for name in &ignored {
            port.notice(&format!("  (ignored invalid: {})", name));
        }
    }

    match parse_answer(spec.kind, &raw) {
        Answer::Keep => Ok(None),
        Answer::Set(value) if &value == current => Ok(None),
        Answer::Set(value) => Ok(Some(value)),
        Answer::Invalid(reason) => {
            port.notice(&format!("  ({}, keeping current)", reason));
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::ScriptedPort;
    use editfx_models::schema::field;

    #[test]
    fn test_empty_answer_keeps() {
        for kind in [
            FieldKind::Bool,
            FieldKind::Int,
            FieldKind::Text,
            FieldKind::ChoiceList(VocabularyKind::TextType),
        ] {
            assert_eq!(parse_answer(kind, "   "), Answer::Keep);
        }
    }

    #[test]
    fn test_bool_and_numbers() {
        assert_eq!(parse_answer(FieldKind::Bool, "YES"), Answer::Set(FieldValue::Bool(true)));
        assert_eq!(parse_answer(FieldKind::Bool, "n"), Answer::Set(FieldValue::Bool(false)));
        assert!(matches!(parse_answer(FieldKind::Bool, "maybe"), Answer::Invalid(_)));
        assert_eq!(parse_answer(FieldKind::Int, "0"), Answer::Set(FieldValue::Int(0)));
        assert!(matches!(parse_answer(FieldKind::Int, "2.5"), Answer::Invalid(_)));
        assert_eq!(parse_answer(FieldKind::Float, "2.5"), Answer::Set(FieldValue::Float(2.5)));
        assert!(matches!(parse_answer(FieldKind::Float, "inf"), Answer::Invalid(_)));
    }

    #[test]
    fn test_choice_by_name_or_value() {
        let kind = FieldKind::Choice(VocabularyKind::PlaybackSpeed);
        assert_eq!(
            parse_answer(kind, "SLOWED"),
            Answer::Set(FieldValue::Text("Slowed".to_string()))
        );
        assert!(matches!(parse_answer(kind, "warp"), Answer::Invalid(_)));
    }

    #[test]
    fn test_choice_list_drops_unknown_names() {
        let kind = FieldKind::ChoiceList(VocabularyKind::TextType);
        assert_eq!(
            parse_answer(kind, "HOOK, bogus, CTA, HOOK"),
            Answer::Set(FieldValue::List(vec!["Hook".into(), "Call to Action".into()]))
        );
        assert!(matches!(parse_answer(kind, "bogus"), Answer::Invalid(_)));
    }

    #[test]
    fn test_prompt_field_reports_invalid_and_keeps() {
        let spec = field("b_roll_count").unwrap();
        let mut port = ScriptedPort::new().with_answers(["lots"]);
        let result = prompt_field(&mut port, spec, &FieldValue::Int(3)).unwrap();
        assert_eq!(result, None);
        assert_eq!(port.notices, vec!["  (invalid int, keeping current)"]);
        assert!(port.prompts[0].starts_with("b_roll_count [current=3] (int, Enter=keep)"));
    }

    #[test]
    fn test_prompt_field_unchanged_value_is_not_a_change() {
        let spec = field("transitions_present").unwrap();
        let mut port = ScriptedPort::new().with_answers(["y"]);
        assert_eq!(prompt_field(&mut port, spec, &FieldValue::Bool(true)).unwrap(), None);
    }
}
