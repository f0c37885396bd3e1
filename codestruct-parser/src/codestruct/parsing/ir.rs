//! Intermediate Representation for the parser
//!
//! The parse tree mirrors the source statements: a `Document` node whose children are
//! entities, doc fields, impl fields and comments, with entity blocks nested as children.
//! Nesting comes only from Indent / Dedent tokens; no semantics are applied yet. The
//! builder turns this tree into the entity model.

use crate::codestruct::range::Range;
use crate::codestruct::token::Token;

/// The type of a node in the parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Entity,
    DocField,
    ImplField,
    Comment,
}

/// An attribute value as written: a scalar token or a bracketed list
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSyntax {
    Scalar(Token),
    Array {
        items: Vec<ValueSyntax>,
        range: Range,
    },
}

impl ValueSyntax {
    pub fn range(&self) -> &Range {
        match self {
            ValueSyntax::Scalar(token) => &token.range,
            ValueSyntax::Array { range, .. } => range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSyntax {
    pub key: Token,
    pub value: ValueSyntax,
}

/// The declaration line of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHeader {
    pub keyword: Token,
    /// Primary name first, then `&` group names
    pub names: Vec<Token>,
    pub hash_ids: Vec<Token>,
    pub attributes: Vec<AttributeSyntax>,
    pub comment: Option<Token>,
}

/// Additional payload carried by specific parse nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseNodePayload {
    Entity(EntityHeader),
    Doc(Option<Token>),
    Impl(Token),
    Comment(Token),
}

/// A node in the parse tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    pub node_type: NodeType,
    /// All tokens of the statement line(s), excluding the children's
    pub tokens: Vec<Token>,
    pub children: Vec<ParseNode>,
    pub payload: Option<ParseNodePayload>,
}

impl ParseNode {
    pub fn new(node_type: NodeType, tokens: Vec<Token>, children: Vec<ParseNode>) -> Self {
        Self {
            node_type,
            tokens,
            children,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: ParseNodePayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Range of the statement's own tokens
    pub fn range(&self) -> Range {
        Range::bounding_box(self.tokens.iter().map(|token| &token.range)).unwrap_or_default()
    }

    /// Count nodes of a given type in this subtree
    pub fn count(&self, node_type: NodeType) -> usize {
        let own = usize::from(self.node_type == node_type);
        own + self
            .children
            .iter()
            .map(|child| child.count(node_type))
            .sum::<usize>()
    }
}
