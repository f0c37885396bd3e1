//! Minification
//!
//! A compact, lossy, single-line encoding meant for feeding structure to tools with a small
//! input budget:
//!
//! ```text
//! m:core|(cl:Engine|fn:run|p:speed[t:INT])|v:state;fn:main
//! ```
//!
//! `;` separates root entities, `|` introduces each child, and a child that has children
//! of its own is wrapped in parentheses. Keywords, attribute keys, type names and common
//! values are abbreviated through the fixed tables in [`tables`].
//!
//! Impl blocks, hash ids and comments are always dropped. Docs are dropped unless
//! [`MinifyConfig::drop_docs`] is off. What survives is enough for [`unminify`] to rebuild
//! the same keywords, names, child order and attribute values.

pub mod legend;
pub mod reader;
pub mod tables;
pub mod writer;

pub use legend::legend;
pub use reader::{unminify, MinifiedSyntaxError};
pub use writer::MinifiedWriter;

use super::model::Document;

/// The keyword carrying a kept doc in minified text
pub const DOC_KEYWORD: &str = "doc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifyConfig {
    /// Append the legend block after the body
    pub legend: bool,
    pub drop_docs: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            legend: true,
            drop_docs: true,
        }
    }
}

pub fn minify(document: &Document, config: &MinifyConfig) -> String {
    let mut output = MinifiedWriter::new(document, config).write();
    if config.legend {
        output.push('\n');
        output.push_str(&legend());
        output.push('\n');
    }
    log::debug!(
        "minified {} entities into {} bytes",
        document.len(),
        output.len()
    );
    output
}

/// Size comparison between a source text and its minified form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinifyStats {
    pub original_bytes: usize,
    pub minified_bytes: usize,
}

impl MinifyStats {
    pub fn new(original: &str, minified: &str) -> Self {
        Self {
            original_bytes: original.len(),
            minified_bytes: minified.len(),
        }
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        let saved = self.original_bytes as f64 - self.minified_bytes as f64;
        saved * 100.0 / self.original_bytes as f64
    }
}
