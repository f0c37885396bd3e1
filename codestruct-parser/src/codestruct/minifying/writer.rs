//! Minified text writer

use super::tables::{Abbreviations, ATTRIBUTE_KEYS, KEYWORDS, TYPES, VALUE_TOKENS};
use super::{MinifyConfig, DOC_KEYWORD};
use crate::codestruct::formatting::quoting::quote;
use crate::codestruct::lexing::classify::is_number;
use crate::codestruct::model::{AttributeValue, Document, Entity, EntityId};

/// Characters with a meaning in minified text
const DELIMITERS: &[char] = &[';', '|', '(', ')', '&', ':', ',', '[', ']', '"', '#'];

pub struct MinifiedWriter<'a> {
    document: &'a Document,
    config: &'a MinifyConfig,
}

impl<'a> MinifiedWriter<'a> {
    pub fn new(document: &'a Document, config: &'a MinifyConfig) -> Self {
        Self { document, config }
    }

    /// The body: top-level items joined by `;`
    pub fn write(&self) -> String {
        let root = self.document.root();
        let mut items = Vec::with_capacity(root.children.len() + 1);
        if let Some(doc) = self.kept_doc(root) {
            items.push(doc);
        }
        items.extend(root.children.iter().map(|id| self.entity(*id)));
        items.join(";")
    }

    fn entity(&self, id: EntityId) -> String {
        let entity = self.document.entity(id);
        let mut out = self.header(entity);
        if let Some(doc) = self.kept_doc(entity) {
            out.push('|');
            out.push_str(&doc);
        }
        for child in &entity.children {
            out.push('|');
            if self.has_block(*child) {
                out.push('(');
                out.push_str(&self.entity(*child));
                out.push(')');
            } else {
                out.push_str(&self.header(self.document.entity(*child)));
            }
        }
        out
    }

    /// Would this entity write anything after its header?
    fn has_block(&self, id: EntityId) -> bool {
        let entity = self.document.entity(id);
        !entity.children.is_empty() || self.kept_doc(entity).is_some()
    }

    fn kept_doc(&self, entity: &Entity) -> Option<String> {
        if self.config.drop_docs {
            return None;
        }
        let doc = entity.doc.as_ref()?;
        Some(format!("{}:{}", shorten(DOC_KEYWORD, &KEYWORDS), quote(&doc.text)))
    }

    fn header(&self, entity: &Entity) -> String {
        let keyword = entity.keyword.as_str();
        // The bare `dc` abbreviation is reserved for docs
        let mut out = if keyword == DOC_KEYWORD {
            quote(keyword)
        } else {
            shorten(keyword, &KEYWORDS)
        };
        out.push(':');
        let names: Vec<String> = entity
            .names
            .iter()
            .map(|name| shorten(&name.text, &TYPES))
            .collect();
        out.push_str(&names.join("&"));

        if !entity.attributes.is_empty() {
            let attributes: Vec<String> = entity
                .attributes
                .iter()
                .map(|attribute| {
                    format!(
                        "{}:{}",
                        shorten(&attribute.key, &ATTRIBUTE_KEYS),
                        value(&attribute.value)
                    )
                })
                .collect();
            out.push('[');
            out.push_str(&attributes.join(","));
            out.push(']');
        }
        out
    }
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || DELIMITERS.contains(&c))
}

/// Abbreviate if the table knows `text`. Text that would be mistaken for an abbreviation
/// is quoted, since the reader only expands bare tokens.
fn shorten(text: &str, table: &Abbreviations) -> String {
    match table.shorten(text) {
        Some(short) => short.to_string(),
        None if needs_quotes(text) || table.is_short(text) => quote(text),
        None => text.to_string(),
    }
}

fn value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Number(text) => text.clone(),
        AttributeValue::Bare(text) | AttributeValue::Quoted(text) if is_number(text) => {
            quote(text)
        }
        AttributeValue::Bare(text) | AttributeValue::Quoted(text) => shorten(text, &VALUE_TOKENS),
        AttributeValue::Array(items) => {
            let items: Vec<String> = items.iter().map(self::value).collect();
            format!("[{}]", items.join(","))
        }
    }
}
