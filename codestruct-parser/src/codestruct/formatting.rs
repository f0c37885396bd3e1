//! Canonical formatting
//!
//! Renders a [`Document`] back to text in one canonical layout:
//!
//! ```text
//! # leading comment
//! keyword: name &other ::: hash [key: value, list: [a, b]] # inline comment
//!   doc: One line of documentation
//!   impl:
//!     ```python
//!     code, re-indented one level below `impl:`
//!     ```
//!   child: entity
//!   # trailing comment
//! ```
//!
//! Root-level entities are separated by one blank line; everything else is single-spaced.
//! Attribute order is kept as authored. Doc, impl and hash id content is copied verbatim,
//! so formatting never changes a content hash, and formatting formatted output is a no-op.

pub mod config;
pub mod keys;
pub mod quoting;
pub mod serializer;

pub use config::{FormatConfig, FormatConfigError, IndentStyle, LineRange};
pub use serializer::CodestructSerializer;

use super::error::ParseError;
use super::model::Document;
use super::parse_document;

pub fn format(document: &Document, config: &FormatConfig) -> String {
    let output = CodestructSerializer::new(document, config).serialize();
    log::debug!(
        "formatted {} entities into {} bytes",
        document.len(),
        output.len()
    );
    output
}

/// Parse and format in one step
pub fn format_source(source: &str, config: &FormatConfig) -> Result<String, ParseError> {
    let document = parse_document(source)?;
    Ok(format(&document, config))
}
