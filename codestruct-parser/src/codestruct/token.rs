//! Token definitions
//!
//! Tokens are what the lexer hands to the parser. Every token keeps its raw source text
//! (quoted strings keep their quotes, code blocks keep their fences) and its range.
//! Indent, Dedent and Newline are synthetic: their text is empty or `"\n"`.

use super::range::Range;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Keyword,
    EntityName,
    AttrKey,
    BareValue,
    QuotedValue,
    NumberValue,
    Colon,
    Comma,
    Ampersand,
    LBracket,
    RBracket,
    HashMarker,
    HashValue,
    DocMarker,
    Docstring,
    ImplMarker,
    CodeBlock,
    Comment,
    Indent,
    Dedent,
    Newline,
}

impl TokenKind {
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::BareValue | TokenKind::QuotedValue | TokenKind::NumberValue
        )
    }

    /// Human-readable name used in syntax errors
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::EntityName => "entity name",
            TokenKind::AttrKey => "attribute key",
            TokenKind::BareValue => "value",
            TokenKind::QuotedValue => "quoted string",
            TokenKind::NumberValue => "number",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Ampersand => "'&'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::HashMarker => "':::'",
            TokenKind::HashValue => "hash id",
            TokenKind::DocMarker => "'doc'",
            TokenKind::Docstring => "docstring",
            TokenKind::ImplMarker => "'impl'",
            TokenKind::CodeBlock => "code block",
            TokenKind::Comment => "comment",
            TokenKind::Indent => "indentation",
            TokenKind::Dedent => "end of block",
            TokenKind::Newline => "end of line",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: Range,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
        }
    }

    /// Description for error messages: the kind, plus the text when it carries any.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::Newline
            | TokenKind::CodeBlock
            | TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::Ampersand
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::HashMarker => self.kind.describe().to_string(),
            _ => format!("{} `{}`", self.kind, self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Indent => write!(f, "<indent>"),
            TokenKind::Dedent => write!(f, "<dedent>"),
            TokenKind::Newline => write!(f, "<newline>"),
            _ => write!(f, "{}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_includes_text_for_words() {
        let token = Token::new(TokenKind::EntityName, "Foo", Range::default());
        assert_eq!(token.describe(), "entity name `Foo`");

        let colon = Token::new(TokenKind::Colon, ":", Range::default());
        assert_eq!(colon.describe(), "':'");
    }

    #[test]
    fn test_value_kinds() {
        assert!(TokenKind::NumberValue.is_value());
        assert!(TokenKind::QuotedValue.is_value());
        assert!(!TokenKind::AttrKey.is_value());
    }
}
