//! Tree builder
//!
//! Parse tree → [`Document`]. The builder is total: every tree the parser accepts builds.
//!
//! - Doc and impl fields attach to the entity owning the block they sit in (top-level ones
//!   attach to the root). A repeated field replaces the earlier one.
//! - Attribute keys are unique; a repeated key takes the last value in the first position.
//! - Quoted names, keys and values are unescaped. Unquoted values that look numeric become
//!   [`AttributeValue::Number`].
//! - Comment lines attach to the next entity in the same block, or close the block when
//!   no entity follows.

use super::lexing::FENCE;
use super::model::{
    Attribute, AttributeValue, Comment, Doc, Document, Entity, EntityId, HashId, Implementation,
    Keyword, Name,
};
use super::parsing::ir::{EntityHeader, ParseNode, ParseNodePayload, ValueSyntax};
use super::range::Range;
use super::token::{Token, TokenKind};

/// Build the entity model from a parse tree
pub fn build(tree: &ParseNode) -> Document {
    let mut builder = DocumentBuilder {
        document: Document::new(),
    };
    builder.block(EntityId::ROOT, &tree.children);
    log::debug!("built document with {} entities", builder.document.len());
    builder.document
}

struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    fn block(&mut self, owner: EntityId, nodes: &[ParseNode]) {
        let mut pending = Vec::new();
        for node in nodes {
            match &node.payload {
                Some(ParseNodePayload::Comment(token)) => {
                    pending.push(Comment::from_source(&token.text, token.range.clone()));
                }
                Some(ParseNodePayload::Doc(text)) => {
                    let owner = self.document.entity_mut(owner);
                    owner.doc = Some(Doc {
                        text: text
                            .as_ref()
                            .map(|token| token.text.trim().to_string())
                            .unwrap_or_default(),
                        range: node.range(),
                    });
                }
                Some(ParseNodePayload::Impl(code)) => {
                    let implementation = implementation(code, node.range());
                    self.document.entity_mut(owner).implementation = Some(implementation);
                }
                Some(ParseNodePayload::Entity(header)) => {
                    let mut entity = entity(header, node.range());
                    entity.comments = std::mem::take(&mut pending);
                    let id = self.document.push(owner, entity);
                    self.block(id, &node.children);
                    self.close_extent(id);
                }
                None => log::warn!("parse node without payload at {}", node.range()),
            }
        }
        self.document.entity_mut(owner).trailing_comments = pending;
    }

    fn close_extent(&mut self, id: EntityId) {
        let entity = self.document.entity(id);
        let mut ranges = vec![entity.range.clone()];
        ranges.extend(entity.doc.as_ref().map(|doc| doc.range.clone()));
        ranges.extend(
            entity
                .implementation
                .as_ref()
                .map(|implementation| implementation.range.clone()),
        );
        ranges.extend(
            entity
                .children
                .iter()
                .map(|child| self.document.entity(*child).extent.clone()),
        );
        ranges.extend(entity.trailing_comments.iter().map(|c| c.range.clone()));
        if let Some(extent) = Range::bounding_box(ranges.iter()) {
            self.document.entity_mut(id).extent = extent;
        }
    }
}

fn entity(header: &EntityHeader, range: Range) -> Entity {
    let names = header
        .names
        .iter()
        .map(|token| Name {
            text: unquote(&token.text),
            range: token.range.clone(),
        })
        .collect();

    let mut entity = Entity::new(
        EntityId::ROOT,
        Keyword::new(&header.keyword.text),
        names,
        range,
    );
    for attribute in &header.attributes {
        entity.set_attribute(Attribute {
            key: unquote(&attribute.key.text),
            value: value(&attribute.value),
            key_range: attribute.key.range.clone(),
            range: attribute.key.range.to(attribute.value.range()),
        });
    }
    entity.hash_ids = header
        .hash_ids
        .iter()
        .map(|token| HashId {
            value: unquote(&token.text),
            range: token.range.clone(),
        })
        .collect();
    entity.inline_comment = header
        .comment
        .as_ref()
        .map(|token| Comment::from_source(&token.text, token.range.clone()));
    entity
}

fn value(syntax: &ValueSyntax) -> AttributeValue {
    match syntax {
        ValueSyntax::Scalar(token) => scalar(token),
        ValueSyntax::Array { items, .. } => AttributeValue::Array(items.iter().map(value).collect()),
    }
}

fn scalar(token: &Token) -> AttributeValue {
    match token.kind {
        TokenKind::NumberValue => AttributeValue::Number(token.text.clone()),
        TokenKind::QuotedValue => AttributeValue::Quoted(unquote(&token.text)),
        _ => AttributeValue::Bare(token.text.clone()),
    }
}

/// Split a code-block token into language and body. The body is re-based on the closing
/// fence's indentation: each line loses up to that many leading whitespace characters.
fn implementation(token: &Token, range: Range) -> Implementation {
    let lines: Vec<&str> = token.text.split('\n').collect();
    let language = lines
        .first()
        .map(|open| open.trim().trim_start_matches(FENCE).trim())
        .filter(|language| !language.is_empty())
        .map(str::to_string);

    let close_indent = lines
        .last()
        .map(|close| close.chars().take_while(|c| c.is_whitespace()).count())
        .unwrap_or(0);
    let body = if lines.len() > 2 {
        &lines[1..lines.len() - 1]
    } else {
        &[][..]
    };
    let code = body
        .iter()
        .map(|line| strip_indent(line, close_indent))
        .collect::<Vec<_>>()
        .join("\n");

    Implementation {
        language,
        code,
        range,
    }
}

fn strip_indent(line: &str, width: usize) -> &str {
    let cut: usize = line
        .chars()
        .take(width)
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(char::len_utf8)
        .sum();
    &line[cut..]
}

/// Remove surrounding double quotes and resolve backslash escapes. Text without quotes
/// is returned as is.
pub fn unquote(text: &str) -> String {
    let inner = match text.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => return text.to_string(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::parse_document;

    fn doc(source: &str) -> Document {
        parse_document(source).expect("source should parse")
    }

    #[test]
    fn test_nested_module() {
        let document = doc("module: main\n  class: Foo\n    func: bar\n");
        assert_eq!(document.len(), 3);
        let module = document.entity(document.top_level()[0]);
        assert_eq!(module.label(), "module:main");
        let class = document.children(module.id).next().unwrap();
        assert_eq!(class.label(), "class:Foo");
        let func = document.children(class.id).next().unwrap();
        assert_eq!(func.label(), "func:bar");
        assert_eq!(func.parent, Some(class.id));
        assert!(func.is_leaf());
    }

    #[test]
    fn test_attribute_values() {
        let document =
            doc("var: x [type: int, size: 4, ratio: -0.5, label: \"a \\\"b\\\"\", tags: [a, \"b c\", 3]]\n");
        let var = document.find("x").unwrap();
        assert_eq!(var.attribute("type"), Some(&AttributeValue::Bare("int".into())));
        assert_eq!(var.attribute("size"), Some(&AttributeValue::Number("4".into())));
        assert_eq!(var.attribute("ratio"), Some(&AttributeValue::Number("-0.5".into())));
        assert_eq!(
            var.attribute("label"),
            Some(&AttributeValue::Quoted("a \"b\"".into()))
        );
        assert_eq!(
            var.attribute("tags"),
            Some(&AttributeValue::Array(vec![
                AttributeValue::Bare("a".into()),
                AttributeValue::Quoted("b c".into()),
                AttributeValue::Number("3".into()),
            ]))
        );
    }

    #[rstest::rstest(
        written,
        expected,
        case("\"p\\rq\"", "p\rq"),
        case("\"a\\nb\"", "a\nb"),
        case("\"a\\tb\"", "a\tb"),
        case("\"say \\\"hi\\\"\"", "say \"hi\""),
        case("\"back\\\\slash\"", "back\\slash"),
        case("bare", "bare")
    )]
    fn test_unquote_reverses_quote(written: &str, expected: &str) {
        assert_eq!(unquote(written), expected);
        assert_eq!(unquote(&crate::codestruct::formatting::quoting::quote(expected)), expected);
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let document = doc("var: x [type: int, size: 4, type: str]\n");
        let var = document.find("x").unwrap();
        let keys: Vec<_> = var.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["type", "size"]);
        assert_eq!(var.attribute("type"), Some(&AttributeValue::Bare("str".into())));
    }

    #[test]
    fn test_grouped_declaration() {
        let document = doc("class: MyClass &Group1 &Group2\n  func: shared\n");
        let class = document.find("MyClass").unwrap();
        assert!(class.is_grouped());
        let views: Vec<_> = document.expanded(class.id).collect();
        assert_eq!(views.len(), 3);
        for view in &views {
            assert_eq!(view.children().len(), 1);
            assert_eq!(view.children()[0].name(), "shared");
        }
    }

    #[test]
    fn test_doc_impl_and_hash_ids() {
        let source = "func: f ::: aaa111 ::: bbb222\n  doc: first\n  doc: Second doc\n  impl:\n    ```python\n    def f():\n        return 1\n    ```\n";
        let document = doc(source);
        let func = document.find("f").unwrap();
        assert_eq!(func.doc.as_ref().unwrap().text, "Second doc");
        let implementation = func.implementation.as_ref().unwrap();
        assert_eq!(implementation.language.as_deref(), Some("python"));
        assert_eq!(implementation.code, "def f():\n    return 1");
        assert_eq!(func.hash_ids.len(), 2);
        assert_eq!(func.hash_id(), Some("bbb222"));
    }

    #[test]
    fn test_top_level_doc_attaches_to_root() {
        let document = doc("doc: The whole system\nmodule: m\n");
        assert_eq!(document.root().doc.as_ref().unwrap().text, "The whole system");
    }

    #[test]
    fn test_comments_attach() {
        let source = "# about m\nmodule: m # inline\n  var: v\n  # closing\n# end of file\n";
        let document = doc(source);
        let module = document.find("m").unwrap();
        assert_eq!(module.comments[0].text, "about m");
        assert_eq!(module.inline_comment.as_ref().unwrap().text, "inline");
        assert_eq!(module.trailing_comments[0].text, "closing");
        assert_eq!(document.root().trailing_comments[0].text, "end of file");
    }

    #[test]
    fn test_trailing_comment_inside_block() {
        let source = "module: m\n  var: v\n  doc: d\n  # closing\nmodule: n\n";
        let document = doc(source);
        let module = document.find("m").unwrap();
        assert_eq!(module.trailing_comments[0].text, "closing");
    }

    #[test]
    fn test_quoted_names() {
        let document = doc("class: \"My Class\" &\"Other One\"\n");
        let class = document.find("My Class").unwrap();
        assert_eq!(class.names[1].text, "Other One");
    }

    #[test]
    fn test_extent_covers_block() {
        let document = doc("module: m\n  var: v\n  var: w\nmodule: n\n");
        let module = document.find("m").unwrap();
        assert_eq!(module.range.start.line, 0);
        assert_eq!(module.extent.end.line, 2);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\"a\\\\b\""), "a\\b");
        assert_eq!(unquote("\"tab\\tnew\\n\""), "tab\tnew\n");
    }
}
