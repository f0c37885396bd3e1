//! Linting
//!
//! One traversal over the document, every enabled rule applied to every entity. The pass
//! always completes and returns the full list of diagnostics, sorted by where they start
//! and then by code.
//!
//! Parse and file-access failures are not rule findings. They are turned into CS001 to
//! CS005 diagnostics by [`lint_source`] and [`lint_file`] so that callers can report every
//! problem through one channel.

pub mod diagnostics;
pub mod rules;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity, UnknownCode};
pub use rules::{LintRule, RuleContext};

use super::loader::DocumentLoader;
use super::model::Document;
use super::parse_document;
use once_cell::sync::Lazy;
use regex::Regex;
use rules::{AttributeKeyNaming, HashIdFormat, MissingDoc, MultipleHashIds, NameLength};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_HASH_ID_PATTERN: &str = "^[0-9a-fA-F]+$";
pub const DEFAULT_ATTRIBUTE_KEY_PATTERN: &str = "^[a-z][a-zA-Z0-9_]*$";

static HASH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_HASH_ID_PATTERN).expect("valid regex"));
static ATTRIBUTE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_ATTRIBUTE_KEY_PATTERN).expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintConfig {
    pub min_name_length: usize,
    pub documented_keywords: Vec<String>,
    pub hash_id_pattern: String,
    pub attribute_key_pattern: String,
    pub disabled: Vec<DiagnosticCode>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            min_name_length: 2,
            documented_keywords: vec!["module".into(), "class".into(), "func".into()],
            hash_id_pattern: DEFAULT_HASH_ID_PATTERN.to_string(),
            attribute_key_pattern: DEFAULT_ATTRIBUTE_KEY_PATTERN.to_string(),
            disabled: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LintConfigError {
    #[error("invalid {field} pattern '{pattern}': {source}")]
    Pattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, LintConfigError> {
    Regex::new(pattern).map_err(|source| LintConfigError::Pattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
}

impl Linter {
    pub fn new(config: &LintConfig) -> Result<Self, LintConfigError> {
        let hash_id = compile("hash id", &config.hash_id_pattern)?;
        let attribute_key = compile("attribute key", &config.attribute_key_pattern)?;
        Ok(Self::with_rules(config, hash_id, attribute_key))
    }

    fn with_rules(config: &LintConfig, hash_id: Regex, attribute_key: Regex) -> Self {
        let all: Vec<Box<dyn LintRule>> = vec![
            Box::new(NameLength {
                min: config.min_name_length,
            }),
            Box::new(MissingDoc {
                keywords: config
                    .documented_keywords
                    .iter()
                    .map(|keyword| keyword.trim().to_lowercase())
                    .collect(),
            }),
            Box::new(HashIdFormat { pattern: hash_id }),
            Box::new(MultipleHashIds),
            Box::new(AttributeKeyNaming {
                pattern: attribute_key,
            }),
        ];
        let rules = all
            .into_iter()
            .filter(|rule| !config.disabled.contains(&rule.code()))
            .collect();
        Self { rules }
    }

    /// Codes of the rules that will run
    pub fn enabled(&self) -> Vec<DiagnosticCode> {
        self.rules.iter().map(|rule| rule.code()).collect()
    }

    pub fn lint(&self, document: &Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for id in document.walk() {
            let ancestors = document.ancestors(id);
            let context = RuleContext {
                document,
                entity: document.entity(id),
                ancestors: &ancestors,
            };
            for rule in &self.rules {
                diagnostics.extend(rule.check(&context));
            }
        }
        sort(&mut diagnostics);
        log::debug!(
            "linted {} entities: {} diagnostics",
            document.len(),
            diagnostics.len()
        );
        diagnostics
    }

    /// Parse and lint; a parse failure becomes a single CS001 diagnostic
    pub fn lint_source(&self, source: &str) -> Vec<Diagnostic> {
        match parse_document(source) {
            Ok(document) => self.lint(&document),
            Err(err) => vec![Diagnostic::from_parse_error(&err)],
        }
    }

    /// Read, parse and lint; file access failures become CS002 to CS005
    pub fn lint_file(&self, path: impl AsRef<Path>) -> Vec<Diagnostic> {
        match DocumentLoader::from_path(path) {
            Ok(loader) => self.lint_source(loader.source()),
            Err(err) => vec![Diagnostic::from_file_error(&err)],
        }
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::with_rules(
            &LintConfig::default(),
            HASH_ID.clone(),
            ATTRIBUTE_KEY.clone(),
        )
    }
}

fn sort(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|diagnostic| (diagnostic.range.span.start, diagnostic.code));
}

/// Lint with the default configuration
pub fn lint(document: &Document) -> Vec<Diagnostic> {
    Linter::default().lint(document)
}

/// Parse and lint with the default configuration
pub fn lint_source(source: &str) -> Vec<Diagnostic> {
    Linter::default().lint_source(source)
}

/// Read, parse and lint with the default configuration
pub fn lint_file(path: impl AsRef<Path>) -> Vec<Diagnostic> {
    Linter::default().lint_file(path)
}
