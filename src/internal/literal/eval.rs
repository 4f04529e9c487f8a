//! Evaluator for the literal forms emitted by the escaper, used to read generated scripts back.

use thiserror::Error;

use super::{MARGIN_MARKER, QUOTE, TRIM_MARGIN, TRIPLE_QUOTE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("expected a string literal at offset {0}")]
    ExpectedLiteral(usize),

    #[error("unterminated string literal")]
    Unterminated,

    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),

    #[error("unresolved template expression at offset {0}")]
    UnresolvedTemplate(usize),

    #[error("unexpected input after literal: {0:?}")]
    TrailingInput(String),
}

/// Evaluates `source`, which must hold exactly one literal expression.
pub fn evaluate(source: &str) -> Result<String, EvalError> {
    let (value, rest) = parse_literal(source)?;
    if !rest.is_empty() {
        return Err(EvalError::TrailingInput(rest.to_string()));
    }
    Ok(value)
}

/// Parses one literal at the start of `source`, returning its value and the unparsed remainder.
///
/// A `.trimMargin()` call directly after the closing delimiter is applied to the value.
pub fn parse_literal(source: &str) -> Result<(String, &str), EvalError> {
    let mut cursor = Cursor::new(source);
    let mut value = if cursor.eat(TRIPLE_QUOTE) {
        raw_body(&mut cursor)?
    } else if cursor.eat(QUOTE) {
        escaped_body(&mut cursor)?
    } else {
        return Err(EvalError::ExpectedLiteral(0));
    };

    if cursor.eat(TRIM_MARGIN) {
        value = trim_margin(&value);
    }
    Ok((value, cursor.rest()))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, start: usize) -> Result<(), EvalError> {
        match self.bump() {
            Some(found) if found == c => Ok(()),
            Some(_) => Err(EvalError::UnresolvedTemplate(start)),
            None => Err(EvalError::Unterminated),
        }
    }
}

fn raw_body(cursor: &mut Cursor) -> Result<String, EvalError> {
    let mut value = String::new();
    loop {
        if cursor.rest().starts_with(TRIPLE_QUOTE) {
            // the last three quotes of a run close the literal
            let run = cursor.rest().chars().take_while(|&c| c == '"').count();
            value.extend(std::iter::repeat_n('"', run - 3));
            cursor.pos += run;
            return Ok(value);
        }
        match cursor.peek() {
            None => return Err(EvalError::Unterminated),
            Some('$') => template(cursor, &mut value)?,
            Some(c) => {
                value.push(c);
                cursor.bump();
            }
        }
    }
}

fn escaped_body(cursor: &mut Cursor) -> Result<String, EvalError> {
    let mut value = String::new();
    loop {
        match cursor.peek() {
            None | Some('\n') | Some('\r') => return Err(EvalError::Unterminated),
            Some('"') => {
                cursor.bump();
                return Ok(value);
            }
            Some('\\') => {
                cursor.bump();
                value.push(escape_sequence(cursor)?);
            }
            Some('$') => template(cursor, &mut value)?,
            Some(c) => {
                value.push(c);
                cursor.bump();
            }
        }
    }
}

/// Handles a `$` at the cursor. Only `${'c'}` templates can be resolved here.
fn template(cursor: &mut Cursor, value: &mut String) -> Result<(), EvalError> {
    let start = cursor.pos;
    cursor.bump();
    match cursor.peek() {
        Some('{') => {
            cursor.bump();
            cursor.expect('\'', start)?;
            let c = match cursor.bump() {
                Some('\\') => escape_sequence(cursor)?,
                Some('\'') => return Err(EvalError::UnresolvedTemplate(start)),
                Some(c) => c,
                None => return Err(EvalError::Unterminated),
            };
            cursor.expect('\'', start)?;
            cursor.expect('}', start)?;
            value.push(c);
            Ok(())
        }
        Some(c) if c.is_alphabetic() || c == '_' || c == '`' => {
            Err(EvalError::UnresolvedTemplate(start))
        }
        _ => {
            value.push('$');
            Ok(())
        }
    }
}

/// Reads the part of an escape sequence after the backslash.
fn escape_sequence(cursor: &mut Cursor) -> Result<char, EvalError> {
    let c = cursor.bump().ok_or(EvalError::Unterminated)?;
    match c {
        't' => Ok('\t'),
        'b' => Ok('\u{8}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        '\'' | '"' | '\\' | '$' => Ok(c),
        'u' => {
            let digits: String = cursor.rest().chars().take(4).collect();
            if digits.len() != 4 || !digits.chars().all(|d| d.is_ascii_hexdigit()) {
                return Err(EvalError::InvalidEscape('u'));
            }
            cursor.pos += 4;
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or(EvalError::InvalidEscape('u'))
        }
        other => Err(EvalError::InvalidEscape(other)),
    }
}

/// Margin trimming with the `|` marker.
///
/// Blank first and last lines are dropped. A line whose first non-blank character is the marker
/// loses everything up to and including it; other lines are kept verbatim.
pub fn trim_margin(text: &str) -> String {
    let lines = split_lines(text);
    let last = lines.len().saturating_sub(1);
    lines
        .into_iter()
        .enumerate()
        .filter(|&(i, line)| !((i == 0 || i == last) && line.trim().is_empty()))
        .map(|(_, line)| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix(MARGIN_MARKER) {
                Some(stripped) if !trimmed.is_empty() => stripped,
                _ => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits on CRLF, LF and CR.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    lines.push(&text[start..]);
    lines
}
