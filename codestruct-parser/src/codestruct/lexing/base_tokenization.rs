//! In-line tokenization using the logos lexer
//!
//! The line-level lexer strips indentation and handles `doc:` / `impl:` lines and fenced
//! code blocks itself. Everything else on a line goes through [`RawToken`], which knows
//! nothing about context: a `Word` only becomes a keyword, name, key or value once the
//! classifier has seen where it sits.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f\r]+")]
pub enum RawToken {
    #[token(":::")]
    HashMarker,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("&")]
    Ampersand,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Quoted,

    /// A quote that never closes before the end of the line
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r##"[^\s\[\]:,&"#][^\s\[\]:,&"]*"##)]
    Word,
}

/// Tokenize one line of text (without its newline). Unrecognized input comes back as
/// `Err` with the offending byte range.
pub fn tokenize(line: &str) -> Vec<(Result<RawToken, ()>, Range<usize>)> {
    let mut lexer = RawToken::lexer(line);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push((result, lexer.span()));
    }
    tokens
}
