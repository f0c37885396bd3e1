//! Context classification of raw tokens
//!
//! Raw words are ambiguous: `int` is a name after `class:`, a key right after `[`, and a
//! value after `key:`. The classifier tracks where on the logical line we are and which
//! brackets are open, and assigns the final [`TokenKind`].
//!
//! Input it doesn't expect is still classified (as a name or value) so that the parser
//! can report a proper syntax error with the found token.

use super::base_tokenization::RawToken;
use crate::codestruct::token::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid regex"));

/// True if `text` is written as a numeric literal
pub fn is_number(text: &str) -> bool {
    NUMBER.is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    LineStart,
    AfterKeyword,
    Name,
    Trailer,
    HashValue,
    GroupName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Attributes { expect_key: bool },
    Array,
}

#[derive(Debug)]
pub struct LineClassifier {
    slot: Slot,
    brackets: Vec<Bracket>,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            slot: Slot::LineStart,
            brackets: Vec::new(),
        }
    }

    /// Start a new logical line. Open brackets carry over (continuation lines).
    pub fn start_line(&mut self) {
        if self.brackets.is_empty() {
            self.slot = Slot::LineStart;
        }
    }

    /// True while an attribute list or array is open
    pub fn in_brackets(&self) -> bool {
        !self.brackets.is_empty()
    }

    /// Classify a raw token. Comments inside brackets yield `None`.
    pub fn classify(&mut self, raw: RawToken, text: &str) -> Option<TokenKind> {
        match self.brackets.last().copied() {
            Some(bracket) => self.classify_bracketed(bracket, raw, text),
            None => Some(self.classify_top(raw)),
        }
    }

    fn classify_top(&mut self, raw: RawToken) -> TokenKind {
        let word_like = matches!(raw, RawToken::Word | RawToken::Quoted);
        match (self.slot, raw) {
            (Slot::LineStart, RawToken::Word) => {
                self.slot = Slot::AfterKeyword;
                TokenKind::Keyword
            }
            (Slot::AfterKeyword, RawToken::Colon) => {
                self.slot = Slot::Name;
                TokenKind::Colon
            }
            (Slot::Name | Slot::GroupName, _) if word_like => {
                self.slot = Slot::Trailer;
                TokenKind::EntityName
            }
            (Slot::HashValue, _) if word_like => {
                self.slot = Slot::Trailer;
                TokenKind::HashValue
            }
            (_, RawToken::HashMarker) => {
                self.slot = Slot::HashValue;
                TokenKind::HashMarker
            }
            (_, RawToken::Ampersand) => {
                self.slot = Slot::GroupName;
                TokenKind::Ampersand
            }
            (_, RawToken::LBracket) => {
                self.brackets.push(Bracket::Attributes { expect_key: true });
                TokenKind::LBracket
            }
            (_, RawToken::RBracket) => TokenKind::RBracket,
            (_, RawToken::Colon) => TokenKind::Colon,
            (_, RawToken::Comma) => TokenKind::Comma,
            (_, RawToken::Comment) => TokenKind::Comment,
            (_, RawToken::Quoted) => TokenKind::QuotedValue,
            // stray words: let the parser report them
            (_, RawToken::Word) | (_, RawToken::UnterminatedString) => TokenKind::EntityName,
        }
    }

    fn classify_bracketed(
        &mut self,
        bracket: Bracket,
        raw: RawToken,
        text: &str,
    ) -> Option<TokenKind> {
        let kind = match raw {
            RawToken::Comment => return None,
            RawToken::LBracket => {
                self.brackets.push(Bracket::Array);
                TokenKind::LBracket
            }
            RawToken::RBracket => {
                self.brackets.pop();
                if self.brackets.is_empty() {
                    self.slot = Slot::Trailer;
                }
                TokenKind::RBracket
            }
            RawToken::Comma => {
                self.set_expect_key(true);
                TokenKind::Comma
            }
            RawToken::Colon => {
                self.set_expect_key(false);
                TokenKind::Colon
            }
            RawToken::Word | RawToken::Quoted
                if bracket == (Bracket::Attributes { expect_key: true }) =>
            {
                TokenKind::AttrKey
            }
            RawToken::Word if is_number(text) => TokenKind::NumberValue,
            RawToken::Word => TokenKind::BareValue,
            RawToken::Quoted | RawToken::UnterminatedString => TokenKind::QuotedValue,
            RawToken::HashMarker => TokenKind::HashMarker,
            RawToken::Ampersand => TokenKind::Ampersand,
        };
        Some(kind)
    }

    fn set_expect_key(&mut self, value: bool) {
        if let Some(Bracket::Attributes { expect_key }) = self.brackets.last_mut() {
            *expect_key = value;
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::lexing::base_tokenization;

    fn classify_line(classifier: &mut LineClassifier, line: &str) -> Vec<TokenKind> {
        classifier.start_line();
        base_tokenization::tokenize(line)
            .into_iter()
            .filter_map(|(raw, span)| classifier.classify(raw.unwrap(), &line[span]))
            .collect()
    }

    #[test]
    fn test_entity_header() {
        let mut classifier = LineClassifier::new();
        assert_eq!(
            classify_line(&mut classifier, "class: A &B ::: abc"),
            vec![
                TokenKind::Keyword,
                TokenKind::Colon,
                TokenKind::EntityName,
                TokenKind::Ampersand,
                TokenKind::EntityName,
                TokenKind::HashMarker,
                TokenKind::HashValue,
            ]
        );
    }

    #[test]
    fn test_attribute_list() {
        let mut classifier = LineClassifier::new();
        assert_eq!(
            classify_line(&mut classifier, r#"var: x [type: int, size: 4, doc: "hi", tags: [a, 2]]"#),
            vec![
                TokenKind::Keyword,
                TokenKind::Colon,
                TokenKind::EntityName,
                TokenKind::LBracket,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::BareValue,
                TokenKind::Comma,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::NumberValue,
                TokenKind::Comma,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::QuotedValue,
                TokenKind::Comma,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::LBracket,
                TokenKind::BareValue,
                TokenKind::Comma,
                TokenKind::NumberValue,
                TokenKind::RBracket,
                TokenKind::RBracket,
            ]
        );
        assert!(!classifier.in_brackets());
    }

    #[test]
    fn test_brackets_carry_across_lines() {
        let mut classifier = LineClassifier::new();
        classify_line(&mut classifier, "func: f [a: 1,");
        assert!(classifier.in_brackets());
        assert_eq!(
            classify_line(&mut classifier, "  b: 2] # done"),
            vec![
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::NumberValue,
                TokenKind::RBracket,
                TokenKind::Comment,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert!(is_number("42"));
        assert!(is_number("-1.5"));
        assert!(!is_number("1.2.3"));
        assert!(!is_number("v1"));
    }
}
