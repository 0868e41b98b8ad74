//! Tolerant parsing of serialized structures found in dataset cells.
//!
//! Cells written by different tools arrive either as strict JSON or as
//! host-language literals (single-quoted strings, `True`/`False`/`None`,
//! tuples, trailing commas). [`parse_value`] tries strict JSON first, after
//! normalizing quote style, then falls back to a permissive literal parser.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors raised by the permissive literal parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),

    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Outcome of parsing a cell that is expected to hold a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceParse {
    /// The cell decoded to a list (or tuple).
    Sequence(Vec<Value>),
    /// The cell is not a serialized sequence.
    Unparsable,
}

/// Parse `raw` as strict JSON (single quotes normalized to double quotes),
/// falling back to the permissive literal grammar.
pub fn parse_value(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(&raw.replace('\'', "\"")) {
        return Some(value);
    }

    parse_literal(raw).ok()
}

/// Parse `raw` expecting a sequence.
pub fn parse_sequence(raw: &str) -> SequenceParse {
    match parse_value(raw) {
        Some(Value::Array(items)) => SequenceParse::Sequence(items),
        _ => SequenceParse::Unparsable,
    }
}

/// Parse `raw` with the permissive literal grammar only.
pub fn parse_literal(raw: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        chars: raw.char_indices().collect(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some((offset, _)) => Err(LiteralError::TrailingInput(offset)),
    }
}

/// Render a scalar the way it should appear when joined into text.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.peek();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect_more(&self) -> Result<(usize, char), LiteralError> {
        self.peek().ok_or(LiteralError::UnexpectedEnd)
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        let (offset, c) = self.expect_more()?;
        match c {
            '[' => self.sequence(']'),
            '(' => self.sequence(')'),
            '{' => self.mapping(),
            '\'' | '"' => self.string().map(Value::String),
            '-' | '+' | '.' | '0'..='9' => self.number(),
            c if c.is_alphabetic() => self.keyword(),
            found => Err(LiteralError::UnexpectedChar { found, offset }),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            let (_, c) = self.expect_more()?;
            if c == close {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            let (offset, c) = self.expect_more()?;
            match c {
                ',' => {
                    self.bump();
                }
                c if c == close => {}
                found => return Err(LiteralError::UnexpectedChar { found, offset }),
            }
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_ws();
            let (_, c) = self.expect_more()?;
            if c == '}' {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = scalar_text(&self.value()?);
            self.skip_ws();
            match self.bump() {
                Some((_, ':')) => {}
                Some((offset, found)) => return Err(LiteralError::UnexpectedChar { found, offset }),
                None => return Err(LiteralError::UnexpectedEnd),
            }
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            let (offset, c) = self.expect_more()?;
            match c {
                ',' => {
                    self.bump();
                }
                '}' => {}
                found => return Err(LiteralError::UnexpectedChar { found, offset }),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let (_, quote) = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let (offset, c) = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let (_, escaped) = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'a' => out.push('\u{07}'),
                        'b' => out.push('\u{08}'),
                        'f' => out.push('\u{0c}'),
                        'v' => out.push('\u{0b}'),
                        '\\' | '\'' | '"' | '/' => out.push(escaped),
                        '\n' => {}
                        'x' => out.push(self.hex_escape(offset, 2)?),
                        'u' => out.push(self.hex_escape(offset, 4)?),
                        'U' => out.push(self.hex_escape(offset, 8)?),
                        '0'..='7' => out.push(self.octal_escape(offset, escaped)?),
                        // Unknown escapes stay verbatim, backslash included.
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, offset: usize, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let (_, c) = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
            let digit = c.to_digit(16).ok_or(LiteralError::InvalidEscape(offset))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(offset))
    }

    /// Up to three octal digits, the first already consumed.
    fn octal_escape(&mut self, offset: usize, first: char) -> Result<char, LiteralError> {
        let mut code = first.to_digit(8).ok_or(LiteralError::InvalidEscape(offset))?;
        for _ in 0..2 {
            match self.peek().and_then(|(_, c)| c.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.pos += 1;
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(offset))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let mut text = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                if c != '_' {
                    text.push(c);
                }
                self.pos += 1;
            } else {
                break;
            }
        }

        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber(text))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let (offset, first) = self.expect_more()?;
        let mut word = String::new();
        while let Some((_, c)) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match word.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError::UnexpectedChar {
                found: first,
                offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_json_with_single_quotes() {
        let value = parse_value("[{'transcript': 'hi'}]").unwrap();
        assert_eq!(value, json!([{"transcript": "hi"}]));
    }

    #[test]
    fn test_literal_fallback_keeps_apostrophes() {
        // Normalizing quotes breaks this one, so the literal grammar takes over.
        let value = parse_value(r#"[{"transcript": "don't stop", "ok": True, "x": None}]"#).unwrap();
        assert_eq!(value, json!([{"transcript": "don't stop", "ok": true, "x": null}]));
    }

    #[test]
    fn test_tuples_and_trailing_commas() {
        let value = parse_literal("('a', 2, 3.5,)").unwrap();
        assert_eq!(value, json!(["a", 2, 3.5]));
    }

    #[test]
    fn test_parse_sequence_tags_result() {
        assert_eq!(
            parse_sequence("['Transcript', 'Hook']"),
            SequenceParse::Sequence(vec![json!("Transcript"), json!("Hook")])
        );
        assert_eq!(parse_sequence("{'segments': []}"), SequenceParse::Unparsable);
        assert_eq!(parse_sequence("Transcript, Hook"), SequenceParse::Unparsable);
        assert_eq!(parse_sequence(""), SequenceParse::Unparsable);
    }

    #[test]
    fn test_byte_and_wide_escapes() {
        let value = parse_literal(r"['hello\xa0world', '\U0001f3ac cut', '\u00e9\101\0']").unwrap();
        assert_eq!(value, json!(["hello\u{a0}world", "\u{1f3ac} cut", "\u{e9}A\0"]));
    }

    #[test]
    fn test_unknown_escape_kept_verbatim() {
        let value = parse_literal(r"['C:\dir\q', 'a\.b']").unwrap();
        assert_eq!(value, json!(["C:\\dir\\q", "a\\.b"]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_literal("[1, 2"), Err(LiteralError::UnexpectedEnd));
        assert!(matches!(parse_literal("[1] x"), Err(LiteralError::TrailingInput(4))));
        assert!(matches!(parse_literal("nope"), Err(LiteralError::UnexpectedChar { .. })));
        assert!(matches!(parse_literal(r"'\xzz'"), Err(LiteralError::InvalidEscape(1))));
    }
}
