//! Canonical text writer

use super::config::{FormatConfig, LineRange};
use super::keys::fix_keys;
use super::quoting::{bare_value, quote, word};
use crate::codestruct::lexing::FENCE;
use crate::codestruct::model::{AttributeValue, Comment, Document, Entity, EntityId};

pub struct CodestructSerializer<'a> {
    document: &'a Document,
    config: &'a FormatConfig,
    output: String,
    indent_level: usize,
}

impl<'a> CodestructSerializer<'a> {
    pub fn new(document: &'a Document, config: &'a FormatConfig) -> Self {
        Self {
            document,
            config,
            output: String::new(),
            indent_level: 0,
        }
    }

    pub fn serialize(mut self) -> String {
        match self.config.range {
            Some(range) => {
                for id in self.document.top_level() {
                    self.write_in_range(*id, range);
                }
            }
            None => self.write_document(),
        }
        self.output
    }

    fn indent(&self) -> String {
        self.config.indent.unit().repeat(self.indent_level)
    }

    fn write_line(&mut self, text: &str) {
        self.output.push_str(&self.indent());
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank_line(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.output.push('\n');
        }
    }

    fn write_document(&mut self) {
        let root = self.document.root();
        self.write_fields(root);
        for id in &root.children {
            self.blank_line();
            self.write_entity(*id);
        }
        if !root.trailing_comments.is_empty() {
            self.blank_line();
            self.write_comments(&root.trailing_comments);
        }
    }

    fn write_in_range(&mut self, id: EntityId, range: LineRange) {
        let entity = self.document.entity(id);
        if range.contains(entity.range.start.line) {
            self.indent_level = self.document.depth(id);
            self.write_entity(id);
            return;
        }
        for child in &entity.children {
            self.write_in_range(*child, range);
        }
    }

    fn write_entity(&mut self, id: EntityId) {
        let entity = self.document.entity(id);
        self.write_comments(&entity.comments);
        let header = self.header(entity);
        self.write_line(&header);

        self.indent_level += 1;
        self.write_fields(entity);
        for child in &entity.children {
            self.write_entity(*child);
        }
        self.write_comments(&entity.trailing_comments);
        self.indent_level -= 1;
    }

    /// `doc:` then `impl:`, at the current level
    fn write_fields(&mut self, entity: &Entity) {
        match &entity.doc {
            Some(doc) => self.write_doc(&doc.text),
            None if self.config.placeholder_docs && entity.id != EntityId::ROOT => {
                if let Some(text) = placeholder_doc(entity) {
                    self.write_doc(&text);
                }
            }
            None => {}
        }

        if let Some(implementation) = &entity.implementation {
            self.write_line("impl:");
            self.indent_level += 1;
            let open = format!("{}{}", FENCE, implementation.language.as_deref().unwrap_or(""));
            self.write_line(&open);
            if !implementation.code.is_empty() {
                for line in implementation.code.split('\n') {
                    if line.is_empty() {
                        self.output.push('\n');
                    } else {
                        self.write_line(line);
                    }
                }
            }
            self.write_line(FENCE);
            self.indent_level -= 1;
        }
    }

    fn write_doc(&mut self, text: &str) {
        let text = text.replace(['\n', '\r'], " ");
        let text = text.trim();
        if text.is_empty() {
            self.write_line("doc:");
        } else {
            self.write_line(&format!("doc: {}", text));
        }
    }

    fn write_comments(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.write_line(&render_comment(comment));
        }
    }

    fn header(&self, entity: &Entity) -> String {
        let mut line = format!("{}: ", entity.keyword);
        let mut names = entity.names.iter();
        if let Some(first) = names.next() {
            line.push_str(&word(&first.text));
        }
        for name in names {
            line.push_str(" &");
            line.push_str(&word(&name.text));
        }
        for hash in &entity.hash_ids {
            line.push_str(" ::: ");
            line.push_str(&word(&hash.value));
        }

        if !entity.attributes.is_empty() {
            let pairs: Vec<(String, &AttributeValue)> = if self.config.fix_attribute_keys {
                fix_keys(&entity.attributes)
            } else {
                entity
                    .attributes
                    .iter()
                    .map(|attribute| (attribute.key.clone(), &attribute.value))
                    .collect()
            };
            let rendered: Vec<String> = pairs
                .iter()
                .map(|(key, value)| format!("{}: {}", word(key), render_value(value)))
                .collect();
            line.push_str(" [");
            line.push_str(&rendered.join(", "));
            line.push(']');
        }

        if let Some(comment) = &entity.inline_comment {
            line.push(' ');
            line.push_str(&render_comment(comment));
        }
        line
    }
}

pub fn render_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bare(text) => bare_value(text),
        AttributeValue::Quoted(text) => quote(text),
        AttributeValue::Number(text) => text.clone(),
        AttributeValue::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn render_comment(comment: &Comment) -> String {
    if comment.text.is_empty() {
        "#".to_string()
    } else {
        format!("# {}", comment.text)
    }
}

/// `"{names} {noun}"` for keywords that conventionally carry a doc
fn placeholder_doc(entity: &Entity) -> Option<String> {
    let info = entity.keyword.info()?;
    if !info.requires_doc {
        return None;
    }
    let names: Vec<&str> = entity.names.iter().map(|name| name.text.as_str()).collect();
    Some(format!("{} {}", names.join(", "), entity.keyword.noun()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::parse_document;

    #[test]
    fn test_render_value() {
        let value = AttributeValue::Array(vec![
            AttributeValue::Bare("a".into()),
            AttributeValue::Number("1.5".into()),
            AttributeValue::Quoted("x y".into()),
            AttributeValue::Array(Vec::new()),
        ]);
        assert_eq!(render_value(&value), "[a, 1.5, \"x y\", []]");
    }

    #[test]
    fn test_placeholder_uses_noun() {
        let document = parse_document("func: run\nclass: A & B\nvar: v\n").unwrap();
        let docs: Vec<_> = document
            .top_level()
            .iter()
            .map(|id| placeholder_doc(document.entity(*id)))
            .collect();
        assert_eq!(
            docs,
            vec![
                Some("run function".to_string()),
                Some("A, B class".to_string()),
                None
            ]
        );
    }
}
