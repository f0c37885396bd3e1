//! When a token has to be written as a quoted string

use crate::codestruct::lexing::classify::is_number;

/// Characters that end a bare word in the text notation
const DELIMITERS: &[char] = &['[', ']', ':', ',', '&', '"'];

/// Would `text` lex as something other than one bare word?
pub fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.starts_with('#')
        || text
            .chars()
            .any(|c| c.is_whitespace() || DELIMITERS.contains(&c))
}

/// Double-quoted form with backslash escapes
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A name, key or hash id as it should be written
pub fn word(text: &str) -> String {
    if needs_quotes(text) {
        quote(text)
    } else {
        text.to_string()
    }
}

/// A bare string value. Numeric-looking text is quoted so it stays a string.
pub fn bare_value(text: &str) -> String {
    if needs_quotes(text) || is_number(text) {
        quote(text)
    } else {
        text.to_string()
    }
}
