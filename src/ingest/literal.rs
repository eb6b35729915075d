//! Tolerant parser for the literal-structure text stored in the `players` column.
//!
//! The upstream export writes nested mappings in a scripting-language literal
//! syntax rather than JSON: strings may use single quotes, keys are not always
//! quoted, booleans are spelled `True`/`False` and null is `None`. This parser
//! accepts that dialect as well as plain JSON.

use std::fmt;
use thiserror::Error;

/// A parsed literal value.
///
/// Maps keep their entries in source order; keys are always rendered to text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<LiteralValue>),
    Map(Vec<(String, LiteralValue)>),
}

impl LiteralValue {
    /// Returns the entries if this value is a map
    pub fn as_map(&self) -> Option<&[(String, LiteralValue)]> {
        match self {
            LiteralValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` in a map value. Returns `None` for non-maps.
    pub fn get(&self, key: &str) -> Option<&LiteralValue> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, LiteralValue::None)
    }

    /// Short name of the value kind, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralValue::None => "none",
            LiteralValue::Bool(_) => "boolean",
            LiteralValue::Int(_) => "integer",
            LiteralValue::Float(_) => "float",
            LiteralValue::Str(_) => "string",
            LiteralValue::List(_) => "list",
            LiteralValue::Map(_) => "mapping",
        }
    }

    /// Renders scalars as plain text (no quotes). `None` for lists and maps.
    pub fn as_text(&self) -> Option<String> {
        match self {
            LiteralValue::None => Some("None".to_string()),
            LiteralValue::Bool(true) => Some("True".to_string()),
            LiteralValue::Bool(false) => Some("False".to_string()),
            LiteralValue::Int(i) => Some(i.to_string()),
            LiteralValue::Float(f) => Some(format_float(*f)),
            LiteralValue::Str(s) => Some(s.clone()),
            LiteralValue::List(_) | LiteralValue::Map(_) => None,
        }
    }
}

/// Floats keep a trailing `.0` when integral so `7.0` does not turn into `7`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Str(s) => write!(f, "'{s}'"),
            LiteralValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            LiteralValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{key}': {value}")?;
                }
                write!(f, "}}")
            }
            scalar => write!(f, "{}", scalar.as_text().unwrap_or_default()),
        }
    }
}

/// Parse failure with the byte offset where it was detected
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parses a complete literal document. Anything but whitespace after the root
/// value is rejected.
pub fn parse_literal(text: &str) -> Result<LiteralValue, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character '{c}'")));
    }
    Ok(value)
}

/// Deepest nesting of maps and sequences accepted before parsing fails
pub const MAX_NESTING_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "nesting too deep (more than {MAX_NESTING_DEPTH} levels)"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn parse_value(&mut self) -> Result<LiteralValue, LiteralError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => {
                self.enter()?;
                let map = self.parse_map()?;
                self.depth -= 1;
                Ok(map)
            }
            Some(open @ ('[' | '(')) => {
                self.enter()?;
                let close = if open == '[' { ']' } else { ')' };
                let sequence = self.parse_sequence(open, close)?;
                self.depth -= 1;
                Ok(sequence)
            }
            Some('\'') | Some('"') => self.parse_string().map(LiteralValue::Str),
            Some(c) if starts_number(c) => self.parse_number(),
            Some(c) if starts_word(c) => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    fn parse_map(&mut self) -> Result<LiteralValue, LiteralError> {
        self.expect('{')?;
        let mut entries: Vec<(String, LiteralValue)> = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                break;
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;

            // Duplicate keys: last value wins, first position kept
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated mapping")),
            }
        }

        Ok(LiteralValue::Map(entries))
    }

    fn parse_sequence(&mut self, open: char, close: char) -> Result<LiteralValue, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                break;
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {}
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{close}', found '{c}'")));
                }
                None => return Err(self.error("unterminated sequence")),
            }
        }

        Ok(LiteralValue::List(items))
    }

    fn parse_key(&mut self) -> Result<String, LiteralError> {
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string(),
            Some(c) if starts_number(c) => {
                let value = self.parse_number()?;
                Ok(value.as_text().unwrap_or_default())
            }
            Some(c) if starts_word(c) => Ok(self.take_word().to_string()),
            Some(c) => Err(self.error(format!("expected a mapping key, found '{c}'"))),
            None => Err(self.error("unterminated mapping")),
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(LiteralError {
                        offset: start,
                        message: "unterminated string".to_string(),
                    });
                }
                Some(c) if c == quote => break,
                Some('\\') => self.parse_escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('u') => {
                let digits_start = self.pos;
                let end = digits_start + 4;
                let hex = self
                    .src
                    .get(digits_start..end)
                    .ok_or_else(|| self.error("truncated \\u escape"))?;
                if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(self.error(format!("invalid \\u escape '{hex}'")));
                }
                let code = u32::from_str_radix(hex, 16)
                    .map_err(|_| self.error(format!("invalid \\u escape '{hex}'")))?;
                let c = char::from_u32(code)
                    .ok_or_else(|| self.error(format!("invalid code point {code:#x}")))?;
                out.push(c);
                self.pos = end;
            }
            // Unknown escapes are kept verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => return Err(self.error("unterminated escape sequence")),
        }
        Ok(())
    }

    fn parse_number(&mut self) -> Result<LiteralValue, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }

        let mut is_float = false;
        let mut saw_digit = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => saw_digit = true,
                '.' => is_float = true,
                'e' | 'E' if saw_digit => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }

        let text = &self.src[start..self.pos];
        if !saw_digit {
            return Err(LiteralError {
                offset: start,
                message: format!("invalid number '{text}'"),
            });
        }

        if !is_float
            && let Ok(i) = text.parse::<i64>()
        {
            return Ok(LiteralValue::Int(i));
        }
        // Integers beyond i64 degrade to floats
        text.parse::<f64>()
            .map(LiteralValue::Float)
            .map_err(|_| LiteralError {
                offset: start,
                message: format!("invalid number '{text}'"),
            })
    }

    fn take_word(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        &src[start..self.pos]
    }

    fn parse_keyword(&mut self) -> Result<LiteralValue, LiteralError> {
        let start = self.pos;
        match self.take_word() {
            "True" | "true" => Ok(LiteralValue::Bool(true)),
            "False" | "false" => Ok(LiteralValue::Bool(false)),
            "None" | "null" => Ok(LiteralValue::None),
            other => Err(LiteralError {
                offset: start,
                message: format!("unknown bare word '{other}'"),
            }),
        }
    }
}

fn starts_number(c: char) -> bool {
    c.is_ascii_digit() || c == '-' || c == '+' || c == '.'
}

fn starts_word(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
