//! Parser
//!
//! Tokens → concrete parse tree ([`ir::ParseNode`]). The grammar lives in [`parser`].

pub mod ir;
pub mod parser;

pub use ir::{NodeType, ParseNode, ParseNodePayload};

use super::error::SyntaxError;
use super::token::Token;

/// Parse a token stream produced by [`crate::codestruct::lexing::tokenize`]
pub fn parse(tokens: &[Token]) -> Result<ParseNode, SyntaxError> {
    let tree = parser::Parser::new(tokens).parse_document()?;
    log::trace!(
        "parsed {} entities",
        tree.count(NodeType::Entity)
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::ir::ValueSyntax;
    use super::*;
    use crate::codestruct::lexing::tokenize;
    use crate::codestruct::range::Position;

    fn parse_str(source: &str) -> Result<ParseNode, SyntaxError> {
        parse(&tokenize(source).expect("source should lex"))
    }

    fn header(node: &ParseNode) -> &ir::EntityHeader {
        match &node.payload {
            Some(ParseNodePayload::Entity(header)) => header,
            other => panic!("expected entity payload, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_entities() {
        let tree = parse_str("module: m\n  class: C\n    func: f\n  var: v\n").unwrap();
        assert_eq!(tree.node_type, NodeType::Document);
        assert_eq!(tree.children.len(), 1);
        let module = &tree.children[0];
        assert_eq!(module.children.len(), 2);
        assert_eq!(module.children[0].children.len(), 1);
        assert_eq!(tree.count(NodeType::Entity), 4);
    }

    #[test]
    fn test_header_parts() {
        let tree =
            parse_str("class: A, &B &C ::: abc [kind: data, tags: [x, 2]] ::: def # note\n")
                .unwrap();
        let header = header(&tree.children[0]);
        assert_eq!(header.keyword.text, "class");
        let names: Vec<_> = header.names.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        let hashes: Vec<_> = header.hash_ids.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(hashes, vec!["abc", "def"]);
        assert_eq!(header.attributes.len(), 2);
        assert!(matches!(
            &header.attributes[1].value,
            ValueSyntax::Array { items, .. } if items.len() == 2
        ));
        assert_eq!(header.comment.as_ref().unwrap().text, "# note");
    }

    #[test]
    fn test_doc_and_impl_fields() {
        let source = "func: f\n  doc: Does things\n  impl:\n    ```py\n    pass\n    ```\n  impl: ```\n  x\n  ```\n";
        let tree = parse_str(source).unwrap();
        let func = &tree.children[0];
        let types: Vec<_> = func.children.iter().map(|c| c.node_type).collect();
        assert_eq!(
            types,
            vec![NodeType::DocField, NodeType::ImplField, NodeType::ImplField]
        );
    }

    #[test]
    fn test_impl_fence_at_same_level() {
        let tree = parse_str("impl:\n```\ncode\n```\n").unwrap();
        assert_eq!(tree.children[0].node_type, NodeType::ImplField);
    }

    #[test]
    fn test_trailing_comma_in_attributes() {
        let tree = parse_str("var: x [a: 1, b: [],]\n").unwrap();
        assert_eq!(header(&tree.children[0]).attributes.len(), 2);
    }

    #[test]
    fn test_unquoted_multi_word_name_is_an_error() {
        let err = parse_str("class: My Class\n").unwrap_err();
        assert_eq!(err.found, "entity name `Class`");
        assert_eq!(err.range.start, Position::new(0, 10));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_str("class Foo\n").unwrap_err();
        assert_eq!(err.expected, "':' after the keyword");
    }

    #[test]
    fn test_two_attribute_lists() {
        let err = parse_str("var: x [a: 1] [b: 2]\n").unwrap_err();
        assert_eq!(err.expected, "a single attribute list");
    }

    #[test]
    fn test_unclosed_attribute_list() {
        let err = parse_str("var: x [a: 1\n").unwrap_err();
        assert_eq!(err.expected, "',' or ']'");
        assert_eq!(err.found, "end of line");
    }

    #[test]
    fn test_indented_first_line() {
        let err = parse_str("  module: m\n").unwrap_err();
        assert_eq!(err.found, "indentation");
    }

    #[test]
    fn test_indentation_under_doc() {
        let err = parse_str("func: f\n  doc: hi\n    var: x\n").unwrap_err();
        assert_eq!(err.found, "indentation");
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_impl_without_fence() {
        let err = parse_str("impl: return 1\n").unwrap_err();
        assert_eq!(err.expected, "a fenced code block");
    }
}
