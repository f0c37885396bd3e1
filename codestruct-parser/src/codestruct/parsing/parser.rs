//! Recursive descent over the token stream
//!
//! ```text
//! document   := statement* EOF
//! statement  := COMMENT NEWLINE
//!             | DOC_MARKER COLON DOCSTRING? NEWLINE
//!             | IMPL_MARKER COLON ( CODE_BLOCK NEWLINE
//!                                 | NEWLINE ( INDENT CODE_BLOCK NEWLINE DEDENT
//!                                           | CODE_BLOCK NEWLINE ) )
//!             | entity
//! entity     := KEYWORD COLON name trailer* COMMENT? NEWLINE block?
//! trailer    := HASH_MARKER HASH_VALUE | attributes | COMMA? AMPERSAND name
//! block      := INDENT statement+ DEDENT
//! attributes := '[' ( attribute (',' attribute)* ','? )? ']'
//! attribute  := ATTR_KEY COLON value
//! value      := BARE | QUOTED | NUMBER | '[' ( value (',' value)* ','? )? ']'
//! ```
//!
//! The first error aborts the parse.

use super::ir::{AttributeSyntax, EntityHeader, NodeType, ParseNode, ParseNodePayload, ValueSyntax};
use crate::codestruct::error::SyntaxError;
use crate::codestruct::range::Range;
use crate::codestruct::token::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_document(mut self) -> Result<ParseNode, SyntaxError> {
        let children = self.statements(false)?;
        Ok(ParseNode::new(NodeType::Document, Vec::new(), children))
    }

    fn statements(&mut self, in_block: bool) -> Result<Vec<ParseNode>, SyntaxError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Dedent if in_block => break,
                TokenKind::Newline => {
                    self.pos += 1;
                }
                _ => nodes.push(self.statement()?),
            }
        }
        Ok(nodes)
    }

    fn statement(&mut self) -> Result<ParseNode, SyntaxError> {
        match self.peek_kind() {
            Some(TokenKind::Comment) => {
                let comment = self.advance_cloned();
                self.expect(TokenKind::Newline, "end of line")?;
                Ok(ParseNode::new(NodeType::Comment, vec![comment.clone()], Vec::new())
                    .with_payload(ParseNodePayload::Comment(comment)))
            }
            Some(TokenKind::DocMarker) => self.doc_field(),
            Some(TokenKind::ImplMarker) => self.impl_field(),
            Some(TokenKind::Keyword) => self.entity(),
            _ => Err(self.error("a keyword, `doc:`, `impl:` or a comment")),
        }
    }

    fn doc_field(&mut self) -> Result<ParseNode, SyntaxError> {
        let mut tokens = vec![self.advance_cloned()];
        tokens.push(self.expect(TokenKind::Colon, "':'")?);
        let text = self.accept(TokenKind::Docstring);
        tokens.extend(text.clone());
        self.expect(TokenKind::Newline, "end of line")?;
        Ok(ParseNode::new(NodeType::DocField, tokens, Vec::new())
            .with_payload(ParseNodePayload::Doc(text)))
    }

    fn impl_field(&mut self) -> Result<ParseNode, SyntaxError> {
        let mut tokens = vec![self.advance_cloned()];
        tokens.push(self.expect(TokenKind::Colon, "':'")?);

        let code = if let Some(code) = self.accept(TokenKind::CodeBlock) {
            self.expect(TokenKind::Newline, "end of line")?;
            code
        } else {
            self.expect(TokenKind::Newline, "a fenced code block")?;
            if self.accept(TokenKind::Indent).is_some() {
                let code = self.expect(TokenKind::CodeBlock, "a fenced code block")?;
                self.expect(TokenKind::Newline, "end of line")?;
                self.expect(TokenKind::Dedent, "end of the impl block")?;
                code
            } else {
                let code = self.expect(TokenKind::CodeBlock, "a fenced code block")?;
                self.expect(TokenKind::Newline, "end of line")?;
                code
            }
        };

        tokens.push(code.clone());
        Ok(ParseNode::new(NodeType::ImplField, tokens, Vec::new())
            .with_payload(ParseNodePayload::Impl(code)))
    }

    fn entity(&mut self) -> Result<ParseNode, SyntaxError> {
        let start = self.pos;
        let keyword = self.advance_cloned();
        self.expect(TokenKind::Colon, "':' after the keyword")?;
        let name = self.expect(TokenKind::EntityName, "an entity name")?;

        let mut header = EntityHeader {
            keyword,
            names: vec![name],
            hash_ids: Vec::new(),
            attributes: Vec::new(),
            comment: None,
        };
        let mut seen_attributes = false;

        loop {
            match self.peek_kind() {
                Some(TokenKind::HashMarker) => {
                    self.pos += 1;
                    header
                        .hash_ids
                        .push(self.expect(TokenKind::HashValue, "a hash id after ':::'")?);
                }
                Some(TokenKind::LBracket) => {
                    if seen_attributes {
                        return Err(self.error("a single attribute list"));
                    }
                    seen_attributes = true;
                    self.pos += 1;
                    header.attributes = self.attributes()?;
                }
                Some(TokenKind::Comma) => {
                    self.pos += 1;
                    if self.peek_kind() != Some(TokenKind::Ampersand) {
                        return Err(self.error("'&' after ','"));
                    }
                }
                Some(TokenKind::Ampersand) => {
                    self.pos += 1;
                    header
                        .names
                        .push(self.expect(TokenKind::EntityName, "a group name after '&'")?);
                }
                Some(TokenKind::Comment) => {
                    header.comment = Some(self.advance_cloned());
                    break;
                }
                Some(TokenKind::Newline) => break,
                _ => return Err(self.error("'[', ':::', '&', a comment or end of line")),
            }
        }
        self.expect(TokenKind::Newline, "end of line")?;
        let tokens = self.tokens[start..self.pos - 1].to_vec();

        let children = if self.accept(TokenKind::Indent).is_some() {
            let children = self.statements(true)?;
            self.expect(TokenKind::Dedent, "end of block")?;
            children
        } else {
            Vec::new()
        };

        Ok(ParseNode::new(NodeType::Entity, tokens, children)
            .with_payload(ParseNodePayload::Entity(header)))
    }

    /// Attribute list, after the opening bracket
    fn attributes(&mut self) -> Result<Vec<AttributeSyntax>, SyntaxError> {
        let mut attributes = Vec::new();
        loop {
            if self.accept(TokenKind::RBracket).is_some() {
                return Ok(attributes);
            }
            let key = self.expect(TokenKind::AttrKey, "an attribute key or ']'")?;
            self.expect(TokenKind::Colon, "':' after the attribute key")?;
            let value = self.value()?;
            attributes.push(AttributeSyntax { key, value });

            match self.peek_kind() {
                Some(TokenKind::Comma) => self.pos += 1,
                Some(TokenKind::RBracket) => {}
                _ => return Err(self.error("',' or ']'")),
            }
        }
    }

    fn value(&mut self) -> Result<ValueSyntax, SyntaxError> {
        match self.peek_kind() {
            Some(kind) if kind.is_value() => Ok(ValueSyntax::Scalar(self.advance_cloned())),
            Some(TokenKind::LBracket) => {
                let open = self.advance_cloned();
                let mut items = Vec::new();
                loop {
                    if let Some(close) = self.accept(TokenKind::RBracket) {
                        return Ok(ValueSyntax::Array {
                            items,
                            range: open.range.to(&close.range),
                        });
                    }
                    items.push(self.value()?);
                    match self.peek_kind() {
                        Some(TokenKind::Comma) => self.pos += 1,
                        Some(TokenKind::RBracket) => {}
                        _ => return Err(self.error("',' or ']'")),
                    }
                }
            }
            _ => Err(self.error("a value")),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn advance_cloned(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(kind) {
            Some(self.advance_cloned())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, SyntaxError> {
        self.accept(kind).ok_or_else(|| self.error(expected))
    }

    fn error(&self, expected: &str) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError::new(expected, token.describe(), token.range.clone()),
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|token| {
                        Range::new(
                            token.range.span.end..token.range.span.end,
                            token.range.end,
                            token.range.end,
                        )
                    })
                    .unwrap_or_default();
                SyntaxError::new(expected, "end of input", end)
            }
        }
    }
}
