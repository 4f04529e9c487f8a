//! String literal synthesis for generated custom command scripts: turns arbitrary text into one quoted,
//! escaped literal, choosing a single-line escaped form or a margin-prefixed multi-line raw form.

use std::borrow::Cow;

pub mod eval;

/// Character that starts a template expression inside a literal.
pub const INTERPOLATION_TRIGGER: char = '$';
/// Per-line prefix of the multi-line form, removed again by `.trimMargin()`.
pub const MARGIN_MARKER: char = '|';
pub const QUOTE: &str = "\"";
pub const TRIPLE_QUOTE: &str = "\"\"\"";
pub const TRIM_MARGIN: &str = ".trimMargin()";

/// Template entry that evaluates to a literal `$`.
const ESCAPED_DOLLAR: &str = "${'$'}";
/// Replacement for `"""` inside a raw literal: two quotes plus a templated third one.
const BROKEN_TRIPLE_QUOTE: &str = "\"\"${'\"'}";

/// Knobs of [`string_literal_with_quotes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralOptions {
    /// Escape every `$` so it never starts a template expression.
    pub escape_dollar_sign: bool,
    /// The literal lands where a compile-time constant is required, which rules out the
    /// `.trimMargin()` multi-line form.
    pub is_constant_context: bool,
}

impl Default for LiteralOptions {
    fn default() -> Self {
        Self {
            escape_dollar_sign: true,
            is_constant_context: false,
        }
    }
}

impl LiteralOptions {
    pub fn raw() -> Self {
        Self {
            escape_dollar_sign: false,
            ..Self::default()
        }
    }

    pub fn constant() -> Self {
        Self {
            is_constant_context: true,
            ..Self::default()
        }
    }
}

/// Escapes `value` with the default options: `$` escaped, multi-line form allowed.
pub fn escape(value: &str) -> String {
    string_literal_with_quotes(value, LiteralOptions::default())
}

/// Returns the string literal representing `value`, including the wrapping quotes.
///
/// Values containing a line feed are rendered as a `"""` raw literal with a `|` margin on every
/// line followed by `.trimMargin()`, unless `options.is_constant_context` is set. Everything else
/// becomes a single-line literal. The function is total.
pub fn string_literal_with_quotes(value: &str, options: LiteralOptions) -> String {
    if !options.is_constant_context && value.contains('\n') {
        multi_line_literal(value, options.escape_dollar_sign)
    } else {
        single_line_literal(value, options.escape_dollar_sign)
    }
}

fn multi_line_literal(value: &str, escape_dollar_sign: bool) -> String {
    let mut result = String::with_capacity(value.len() + 32);
    result.push_str(TRIPLE_QUOTE);
    result.push('\n');
    result.push(MARGIN_MARKER);

    let mut rest = value;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with(TRIPLE_QUOTE) {
            // the raw literal would end here otherwise
            result.push_str(BROKEN_TRIPLE_QUOTE);
            rest = &rest[TRIPLE_QUOTE.len()..];
            continue;
        }
        match c {
            '\n' => {
                result.push('\n');
                result.push(MARGIN_MARKER);
            }
            INTERPOLATION_TRIGGER if escape_dollar_sign => result.push_str(ESCAPED_DOLLAR),
            _ => result.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }

    // closing delimiter goes on its own line, dropped again by trimMargin()
    if !value.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(TRIPLE_QUOTE);
    result.push_str(TRIM_MARGIN);
    result
}

fn single_line_literal(value: &str, escape_dollar_sign: bool) -> String {
    // the raw delimiter lets unescaped `$` and `"` through untouched
    let delimiter = if escape_dollar_sign { QUOTE } else { TRIPLE_QUOTE };

    let mut result = String::with_capacity(value.len() + 32);
    result.push_str(delimiter);
    for c in value.chars() {
        match c {
            '\'' => result.push('\''),
            '"' if escape_dollar_sign => result.push_str("\\\""),
            INTERPOLATION_TRIGGER if escape_dollar_sign => result.push_str(ESCAPED_DOLLAR),
            _ => result.push_str(&character_literal_without_single_quotes(c)),
        }
    }
    result.push_str(delimiter);
    result
}

/// Escapes one character the way a character literal body would spell it.
///
/// Only the classic escape set is handled; control characters outside it and non-ASCII text are
/// passed through unchanged.
pub fn character_literal_without_single_quotes(c: char) -> Cow<'static, str> {
    match c {
        '\u{8}' => Cow::Borrowed("\\b"),
        '\t' => Cow::Borrowed("\\t"),
        '\n' => Cow::Borrowed("\\n"),
        '\r' => Cow::Borrowed("\\r"),
        '"' => Cow::Borrowed("\""),
        '\'' => Cow::Borrowed("\\'"),
        '\\' => Cow::Borrowed("\\\\"),
        _ => Cow::Owned(c.to_string()),
    }
}
