//! Entities and their fields

use super::keyword::Keyword;
use super::value::AttributeValue;
use crate::codestruct::range::Range;
use serde::Serialize;
use std::fmt;

/// Index of an entity in its [`Document`](super::Document) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub usize);

impl EntityId {
    pub const ROOT: EntityId = EntityId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub text: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
    pub key_range: Range,
    /// Key through value
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doc {
    pub text: String,
    pub range: Range,
}

/// An implementation snippet. The code is opaque; it is stored relative to the indentation
/// of its closing fence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Implementation {
    pub language: Option<String>,
    pub code: String,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashId {
    pub value: String,
    pub range: Range,
}

/// A `#` comment, text without the marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub text: String,
    pub range: Range,
}

impl Comment {
    pub fn from_source(raw: &str, range: Range) -> Self {
        Self {
            text: raw.trim_start_matches('#').trim().to_string(),
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub keyword: Keyword,
    /// Never empty; more than one only for grouped declarations
    pub names: Vec<Name>,
    /// Unique keys, in first-occurrence order
    pub attributes: Vec<Attribute>,
    pub doc: Option<Doc>,
    pub implementation: Option<Implementation>,
    /// All hash ids as written; the last one is authoritative
    pub hash_ids: Vec<HashId>,
    pub children: Vec<EntityId>,
    pub parent: Option<EntityId>,
    /// The declaration line
    pub range: Range,
    /// Declaration line through the end of the block
    pub extent: Range,
    /// Comment lines directly above the declaration
    pub comments: Vec<Comment>,
    /// Comment lines closing the block, after the last child
    pub trailing_comments: Vec<Comment>,
    pub inline_comment: Option<Comment>,
}

impl Entity {
    pub fn new(id: EntityId, keyword: Keyword, names: Vec<Name>, range: Range) -> Self {
        Self {
            id,
            keyword,
            names,
            attributes: Vec::new(),
            doc: None,
            implementation: None,
            hash_ids: Vec::new(),
            children: Vec::new(),
            parent: None,
            extent: range.clone(),
            range,
            comments: Vec::new(),
            trailing_comments: Vec::new(),
            inline_comment: None,
        }
    }

    /// Primary name
    pub fn name(&self) -> &str {
        self.names.first().map(|name| name.text.as_str()).unwrap_or("")
    }

    pub fn is_grouped(&self) -> bool {
        self.names.len() > 1
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| &attribute.value)
    }

    /// Insert or replace an attribute. A repeated key keeps its first position and takes
    /// the new value.
    pub fn set_attribute(&mut self, attribute: Attribute) {
        match self
            .attributes
            .iter_mut()
            .find(|existing| existing.key == attribute.key)
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// The authoritative hash id
    pub fn hash_id(&self) -> Option<&str> {
        self.hash_ids.last().map(|hash| hash.value.as_str())
    }

    /// `keyword:name` label used in messages and change paths
    pub fn label(&self) -> String {
        format!("{}:{}", self.keyword, self.name())
    }
}
