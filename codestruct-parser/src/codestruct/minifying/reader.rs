//! Minified text reader
//!
//! Re-parses minified text into a [`Document`]. Bare tokens are expanded through the
//! abbreviation tables; quoted tokens are taken literally. `#` lines (the legend) are
//! skipped. Impl blocks, hash ids and comments never appear in minified text, so the
//! result carries none.

use super::tables::{Abbreviations, ATTRIBUTE_KEYS, KEYWORDS, TYPES, VALUE_TOKENS};
use super::DOC_KEYWORD;
use crate::codestruct::building::unquote;
use crate::codestruct::lexing::classify::is_number;
use crate::codestruct::model::{
    Attribute, AttributeValue, Doc, Document, Entity, EntityId, Keyword, Name,
};
use crate::codestruct::range::{Range, SourceLocation};
use logos::Logos;
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum MinToken {
    #[token(";")]
    Semicolon,
    #[token("|")]
    Pipe,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("&")]
    Ampersand,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,
    #[regex(r##"[^\s;|()&:,\[\]"#]+"##)]
    Word,
    /// Legend lines
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,
}

impl MinToken {
    fn describe(self) -> &'static str {
        match self {
            MinToken::Semicolon => "';'",
            MinToken::Pipe => "'|'",
            MinToken::LParen => "'('",
            MinToken::RParen => "')'",
            MinToken::Ampersand => "'&'",
            MinToken::Colon => "':'",
            MinToken::Comma => "','",
            MinToken::LBracket => "'['",
            MinToken::RBracket => "']'",
            MinToken::Quoted => "quoted text",
            MinToken::Word => "word",
            MinToken::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found} at offset {offset}")]
pub struct MinifiedSyntaxError {
    pub expected: String,
    pub found: String,
    /// Byte offset into the minified text
    pub offset: usize,
}

#[derive(Debug, Clone)]
struct Lexeme<'s> {
    token: MinToken,
    text: &'s str,
    span: std::ops::Range<usize>,
}

/// Parse minified text back into a document
pub fn unminify(text: &str) -> Result<Document, MinifiedSyntaxError> {
    let mut lexemes = Vec::new();
    for (result, span) in MinToken::lexer(text).spanned() {
        match result {
            Ok(token) => lexemes.push(Lexeme {
                token,
                text: &text[span.clone()],
                span,
            }),
            Err(()) => {
                return Err(MinifiedSyntaxError {
                    expected: "a minified token".into(),
                    found: format!("{:?}", &text[span.clone()]),
                    offset: span.start,
                })
            }
        }
    }

    let mut reader = MinifiedReader {
        lexemes,
        pos: 0,
        end: text.len(),
        location: SourceLocation::new(text),
        document: Document::new(),
    };
    reader.body()?;
    log::debug!("unminified {} entities", reader.document.len());
    Ok(reader.document)
}

struct MinifiedReader<'s> {
    lexemes: Vec<Lexeme<'s>>,
    pos: usize,
    end: usize,
    location: SourceLocation,
    document: Document,
}

/// A parsed `keyword:name&name[attrs]`, before it is placed in the document
struct Header {
    keyword: String,
    names: Vec<Name>,
    attributes: Vec<Attribute>,
    range: Range,
    /// The doc pseudo-entity (`dc:"…"`): its single name is the doc text
    is_doc: bool,
}

impl<'s> MinifiedReader<'s> {
    fn body(&mut self) -> Result<(), MinifiedSyntaxError> {
        if self.peek().is_none() {
            return Ok(());
        }
        loop {
            self.item(EntityId::ROOT, true)?;
            match self.peek() {
                Some(MinToken::Semicolon) => self.pos += 1,
                None => return Ok(()),
                Some(_) => return Err(self.error("';' or end of input")),
            }
        }
    }

    /// One entity (or doc) under `parent`. `with_children` allows a `|` chain.
    fn item(&mut self, parent: EntityId, with_children: bool) -> Result<(), MinifiedSyntaxError> {
        let header = self.header()?;
        if header.is_doc {
            let doc = Doc {
                text: header.names.into_iter().next().map(|n| n.text).unwrap_or_default(),
                range: header.range,
            };
            self.document.entity_mut(parent).doc = Some(doc);
            return Ok(());
        }

        let mut entity = Entity::new(
            EntityId::ROOT,
            Keyword::new(&header.keyword),
            header.names,
            header.range.clone(),
        );
        for attribute in header.attributes {
            entity.set_attribute(attribute);
        }
        let id = self.document.push(parent, entity);

        if with_children {
            while self.peek() == Some(MinToken::Pipe) {
                self.pos += 1;
                if self.peek() == Some(MinToken::LParen) {
                    self.pos += 1;
                    self.item(id, true)?;
                    self.expect(MinToken::RParen, "')'")?;
                } else {
                    self.item(id, false)?;
                }
            }
        }
        Ok(())
    }

    fn header(&mut self) -> Result<Header, MinifiedSyntaxError> {
        // Only the bare abbreviation marks a doc; a quoted "doc" is an ordinary keyword
        let is_doc = self.lexemes.get(self.pos).is_some_and(|lexeme| {
            lexeme.token == MinToken::Word && KEYWORDS.expand(lexeme.text) == Some(DOC_KEYWORD)
        });
        let (keyword, keyword_span) = self.word(&KEYWORDS, "a keyword")?;
        self.expect(MinToken::Colon, "':' after the keyword")?;

        let mut names = Vec::new();
        let names_table: &Abbreviations = if is_doc { &EMPTY } else { &TYPES };
        let (text, span) = self.word(names_table, "a name")?;
        names.push(Name {
            text,
            range: self.location.range(span.clone()),
        });
        let mut end = span.end;

        while self.peek() == Some(MinToken::Ampersand) {
            self.pos += 1;
            let (text, span) = self.word(&TYPES, "a group name after '&'")?;
            end = span.end;
            names.push(Name {
                text,
                range: self.location.range(span),
            });
        }

        let mut attributes = Vec::new();
        if self.peek() == Some(MinToken::LBracket) {
            self.pos += 1;
            loop {
                if let Some(close) = self.accept(MinToken::RBracket) {
                    end = close.end;
                    break;
                }
                let (key, key_span) = self.word(&ATTRIBUTE_KEYS, "an attribute key or ']'")?;
                self.expect(MinToken::Colon, "':' after the attribute key")?;
                let (value, value_end) = self.value()?;
                let key_range = self.location.range(key_span.clone());
                attributes.push(Attribute {
                    key,
                    value,
                    range: self.location.range(key_span.start..value_end),
                    key_range,
                });
                match self.peek() {
                    Some(MinToken::Comma) => self.pos += 1,
                    Some(MinToken::RBracket) => {}
                    _ => return Err(self.error("',' or ']'")),
                }
            }
        }

        Ok(Header {
            keyword,
            names,
            attributes,
            range: self.location.range(keyword_span.start..end),
            is_doc,
        })
    }

    /// A value and the offset where it ends
    fn value(&mut self) -> Result<(AttributeValue, usize), MinifiedSyntaxError> {
        match self.lexemes.get(self.pos).cloned() {
            Some(lexeme) if lexeme.token == MinToken::Quoted => {
                self.pos += 1;
                Ok((AttributeValue::Quoted(unquote(lexeme.text)), lexeme.span.end))
            }
            Some(lexeme) if lexeme.token == MinToken::Word => {
                self.pos += 1;
                let value = if is_number(lexeme.text) {
                    AttributeValue::Number(lexeme.text.to_string())
                } else {
                    let text = VALUE_TOKENS.expand(lexeme.text).unwrap_or(lexeme.text);
                    AttributeValue::Bare(text.to_string())
                };
                Ok((value, lexeme.span.end))
            }
            Some(lexeme) if lexeme.token == MinToken::LBracket => {
                self.pos += 1;
                let mut items = Vec::new();
                loop {
                    if let Some(close) = self.accept(MinToken::RBracket) {
                        return Ok((AttributeValue::Array(items), close.end));
                    }
                    items.push(self.value()?.0);
                    match self.peek() {
                        Some(MinToken::Comma) => self.pos += 1,
                        Some(MinToken::RBracket) => {}
                        _ => return Err(self.error("',' or ']'")),
                    }
                }
            }
            _ => Err(self.error("a value")),
        }
    }

    /// A word or quoted token; bare words are expanded through `table`
    fn word(
        &mut self,
        table: &Abbreviations,
        expected: &str,
    ) -> Result<(String, std::ops::Range<usize>), MinifiedSyntaxError> {
        match self.lexemes.get(self.pos).cloned() {
            Some(lexeme) if lexeme.token == MinToken::Word => {
                self.pos += 1;
                let text = table.expand(lexeme.text).unwrap_or(lexeme.text);
                Ok((text.to_string(), lexeme.span))
            }
            Some(lexeme) if lexeme.token == MinToken::Quoted => {
                self.pos += 1;
                Ok((unquote(lexeme.text), lexeme.span))
            }
            _ => Err(self.error(expected)),
        }
    }

    fn peek(&self) -> Option<MinToken> {
        self.lexemes.get(self.pos).map(|lexeme| lexeme.token)
    }

    fn accept(&mut self, token: MinToken) -> Option<std::ops::Range<usize>> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Some(self.lexemes[self.pos - 1].span.clone())
        } else {
            None
        }
    }

    fn expect(&mut self, token: MinToken, expected: &str) -> Result<(), MinifiedSyntaxError> {
        self.accept(token)
            .map(|_| ())
            .ok_or_else(|| self.error(expected))
    }

    fn error(&self, expected: &str) -> MinifiedSyntaxError {
        match self.lexemes.get(self.pos) {
            Some(lexeme) => MinifiedSyntaxError {
                expected: expected.to_string(),
                found: match lexeme.token {
                    MinToken::Word | MinToken::Quoted => format!("`{}`", lexeme.text),
                    token => token.describe().to_string(),
                },
                offset: lexeme.span.start,
            },
            None => MinifiedSyntaxError {
                expected: expected.to_string(),
                found: "end of input".to_string(),
                offset: self.end,
            },
        }
    }
}

/// Doc text is never abbreviated
static EMPTY: Lazy<Abbreviations> = Lazy::new(Abbreviations::empty);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_nested_children() {
        let document = unminify("m:core|(cl:Engine|fn:run|fn:stop)|v:state;fn:main").unwrap();
        let labels: Vec<_> = document
            .walk()
            .into_iter()
            .map(|id| document.entity(id).label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "module:core",
                "class:Engine",
                "func:run",
                "func:stop",
                "var:state",
                "func:main"
            ]
        );
        assert_eq!(document.depth(document.find("stop").unwrap().id), 2);
    }

    #[test]
    fn test_expands_only_bare_tokens() {
        let document = unminify("v:INT[t:INT,\"t\":\"INT\",flag:T,n:-2.5]").unwrap();
        let var = document.find("INTEGER").unwrap();
        assert_eq!(var.attribute("type"), Some(&AttributeValue::Bare("INTEGER".into())));
        assert_eq!(var.attribute("t"), Some(&AttributeValue::Quoted("INT".into())));
        assert_eq!(var.attribute("flag"), Some(&AttributeValue::Bare("true".into())));
        assert_eq!(var.attribute("n"), Some(&AttributeValue::Number("-2.5".into())));
    }

    #[test]
    fn test_docs_and_groups() {
        let document = unminify("dc:\"The system\";cl:A&B|dc:\"Shared\"|fn:run").unwrap();
        assert_eq!(document.root().doc.as_ref().unwrap().text, "The system");
        let class = document.find("B").unwrap();
        assert_eq!(class.names.len(), 2);
        assert_eq!(class.doc.as_ref().unwrap().text, "Shared");
        assert_eq!(class.children.len(), 1);
    }

    #[test]
    fn test_quoted_doc_keyword_is_an_entity() {
        let document = unminify("\"doc\":readme|v:x").unwrap();
        assert!(document.root().doc.is_none());
        let entity = document.find("readme").unwrap();
        assert_eq!(entity.keyword.as_str(), "doc");
        assert_eq!(entity.children.len(), 1);

        let config = crate::codestruct::minifying::MinifyConfig {
            legend: false,
            drop_docs: false,
        };
        assert_eq!(
            crate::codestruct::minifying::minify(&document, &config),
            "\"doc\":readme|v:x"
        );
    }

    #[test]
    fn test_legend_is_skipped() {
        let document = unminify("fn:f\n# CodeStruct Minified Format Legend\n# Keywords: m=module\n").unwrap();
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(unminify("").unwrap().is_empty());
    }

    #[test]
    fn test_errors_report_offset() {
        let err = unminify("fn:f|(p:a").unwrap_err();
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found, "end of input");
        assert_eq!(err.offset, 9);

        let err = unminify("fn:f[t INT]").unwrap_err();
        assert_eq!(err.expected, "':' after the attribute key");
        assert_eq!(err.offset, 7);
    }
}
