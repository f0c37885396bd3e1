//! Main module for CodeStruct library functionality
//!
//! The free functions re-exported here are the per-pass entry points used by the CLI and
//! by tests. Each one is a thin wrapper over the module that owns the pass.

pub mod building;
pub mod error;
pub mod formatting;
pub mod hashing;
pub mod lexing;
pub mod linting;
pub mod loader;
pub mod minifying;
pub mod model;
pub mod parsing;
pub mod range;
pub mod token;

pub use building::build;
pub use error::{CodestructError, FileAccessError, LexError, ParseError, SyntaxError};
pub use formatting::{format, format_source};
pub use hashing::{hash, locate_change};
pub use lexing::tokenize;
pub use linting::{lint, lint_source};
pub use minifying::{minify, unminify};
pub use parsing::parse;

use model::Document;

/// Parse source text all the way to a [`Document`].
///
/// Lex and syntax errors abort the parse; there is no multi-error recovery.
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let tokens = tokenize(source)?;
    let tree = parse(&tokens)?;
    Ok(build(&tree))
}
