//! Lint rules
//!
//! Each rule looks at one entity at a time, together with its ancestors, and never at
//! sibling state. Rules don't mutate anything and can run in any order.

use super::diagnostics::{Diagnostic, DiagnosticCode};
use crate::codestruct::model::{Document, Entity, EntityId};
use regex::Regex;

/// What a rule sees for one entity
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub entity: &'a Entity,
    /// Parent first, up to the top-level entity
    pub ancestors: &'a [EntityId],
}

pub trait LintRule: Send + Sync {
    fn code(&self) -> DiagnosticCode;

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// CS101
pub struct NameLength {
    pub min: usize,
}

impl LintRule for NameLength {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::NameTooShort
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        context
            .entity
            .names
            .iter()
            .filter(|name| name.text.trim().chars().count() < self.min)
            .map(|name| {
                Diagnostic::new(
                    self.code(),
                    format!(
                        "Entity name '{}' is too short (minimum {} characters)",
                        name.text, self.min
                    ),
                    name.range.clone(),
                )
            })
            .collect()
    }
}

/// CS201
pub struct MissingDoc {
    /// Normalized keywords that must carry a doc
    pub keywords: Vec<String>,
}

impl LintRule for MissingDoc {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::MissingDoc
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let entity = context.entity;
        let keyword = entity.keyword.normalized();
        if entity.doc.is_some() || !self.keywords.iter().any(|k| *k == keyword) {
            return Vec::new();
        }
        vec![Diagnostic::new(
            self.code(),
            format!(
                "{} '{}' is missing documentation",
                capitalize(&keyword),
                entity.name()
            ),
            entity.range.clone(),
        )]
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// CS301
pub struct HashIdFormat {
    pub pattern: Regex,
}

impl LintRule for HashIdFormat {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::HashIdFormat
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        context
            .entity
            .hash_ids
            .iter()
            .filter(|hash| !self.pattern.is_match(&hash.value))
            .map(|hash| {
                Diagnostic::new(
                    self.code(),
                    format!("Hash ID '{}' is not a hexadecimal token", hash.value),
                    hash.range.clone(),
                )
            })
            .collect()
    }
}

/// CS302
pub struct MultipleHashIds;

impl LintRule for MultipleHashIds {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::MultipleHashIds
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let hash_ids = &context.entity.hash_ids;
        match hash_ids.last() {
            Some(last) if hash_ids.len() > 1 => vec![Diagnostic::new(
                self.code(),
                format!(
                    "'{}' has {} hash IDs; the last one ('{}') is authoritative",
                    context.entity.name(),
                    hash_ids.len(),
                    last.value
                ),
                last.range.clone(),
            )],
            _ => Vec::new(),
        }
    }
}

/// CS401
pub struct AttributeKeyNaming {
    pub pattern: Regex,
}

impl LintRule for AttributeKeyNaming {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::AttributeKeyNaming
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        context
            .entity
            .attributes
            .iter()
            .filter(|attribute| !self.pattern.is_match(&attribute.key))
            .map(|attribute| {
                Diagnostic::new(
                    self.code(),
                    format!(
                        "Attribute key '{}' should be camelCase or snake_case starting with lowercase",
                        attribute.key
                    ),
                    attribute.key_range.clone(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::parse_document;

    fn run(rule: &dyn LintRule, source: &str) -> Vec<Diagnostic> {
        let document = parse_document(source).unwrap();
        document
            .walk()
            .into_iter()
            .flat_map(|id| {
                let ancestors = document.ancestors(id);
                rule.check(&RuleContext {
                    document: &document,
                    entity: document.entity(id),
                    ancestors: &ancestors,
                })
            })
            .collect()
    }

    #[test]
    fn test_name_length_checks_every_grouped_name() {
        let found = run(&NameLength { min: 2 }, "class: A & Bee & C\n");
        let messages: Vec<_> = found.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Entity name 'A' is too short (minimum 2 characters)",
                "Entity name 'C' is too short (minimum 2 characters)",
            ]
        );
        assert_eq!(found[1].range.start.column, 17);
    }

    #[test]
    fn test_missing_doc() {
        let rule = MissingDoc {
            keywords: vec!["module".into(), "func".into()],
        };
        let found = run(
            &rule,
            "module: main\n  func: run\n    doc: Runs\n  var: state\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Module 'main' is missing documentation");
        assert_eq!(found[0].range.start.line, 0);
    }

    #[test]
    fn test_hash_id_format() {
        let rule = HashIdFormat {
            pattern: Regex::new("^[0-9a-fA-F]+$").unwrap(),
        };
        let found = run(&rule, "func: f ::: abc123\nfunc: g ::: not-hex\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Hash ID 'not-hex' is not a hexadecimal token");
        assert_eq!(found[0].range.start.line, 1);
    }

    #[test]
    fn test_multiple_hash_ids_points_at_the_last() {
        let found = run(&MultipleHashIds, "func: f ::: aaaaaa ::: bbbbbb\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("'bbbbbb'"));
        assert_eq!(found[0].range.start.column, 23);
    }

    #[test]
    fn test_attribute_key_naming() {
        let rule = AttributeKeyNaming {
            pattern: Regex::new("^[a-z][a-zA-Z0-9_]*$").unwrap(),
        };
        let found = run(&rule, "var: x [type: int, MaxSize: 4, snake_key: 1]\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.starts_with("Attribute key 'MaxSize'"));
        assert_eq!(found[0].range.start.column, 19);
    }
}
