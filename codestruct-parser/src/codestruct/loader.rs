//! Document loading utilities
//!
//! `DocumentLoader` holds source text read from a `.cst` file or given as a string and
//! runs the passes up to the stage the caller needs. The CLI and the linter read files
//! through it so that I/O failures are classified the same way everywhere.
//!
//! ```rust,ignore
//! use codestruct_parser::codestruct::loader::DocumentLoader;
//!
//! let document = DocumentLoader::load("design.cst")?;
//! let tokens = DocumentLoader::from_string("var: x\n").tokenize()?;
//! ```

use crate::codestruct::error::{CodestructError, FileAccessError, ParseError};
use crate::codestruct::model::Document;
use crate::codestruct::parsing::ParseNode;
use crate::codestruct::token::Token;
use crate::codestruct::{build, parse, tokenize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DocumentLoader {
    source: String,
    path: Option<PathBuf>,
}

impl DocumentLoader {
    /// Read a UTF-8 file. Failures are classified as not found, permission denied,
    /// decode or other OS errors.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FileAccessError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| FileAccessError::from_io(path, &err))?;
        log::debug!("loaded {} ({} bytes)", path.display(), source.len());
        Ok(DocumentLoader {
            source,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            path: None,
        }
    }

    /// Read and parse in one step
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Document, CodestructError> {
        Ok(Self::from_path(path)?.parse()?)
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, ParseError> {
        Ok(tokenize(&self.source)?)
    }

    pub fn parse_tree(&self) -> Result<ParseNode, ParseError> {
        Ok(parse(&self.tokenize()?)?)
    }

    pub fn parse(&self) -> Result<Document, ParseError> {
        let document = build(&self.parse_tree()?);
        if let Some(path) = &self.path {
            log::trace!("{}: {} entities", path.display(), document.len());
        }
        Ok(document)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The file this source came from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codestruct::parsing::NodeType;
    use crate::codestruct::token::TokenKind;
    use std::io::Write;

    #[test]
    fn test_from_string() {
        let loader = DocumentLoader::from_string("var: x\n");
        assert_eq!(loader.source(), "var: x\n");
        assert!(loader.path().is_none());
    }

    #[test]
    fn test_each_stage_reads_the_same_source() {
        let loader = DocumentLoader::from_string("module: m\n  var: v\n");
        let tokens = loader.tokenize().unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Indent));
        let tree = loader.parse_tree().unwrap();
        assert_eq!(tree.node_type, NodeType::Document);
        assert_eq!(tree.count(NodeType::Entity), 2);
        let document = loader.parse().unwrap();
        assert!(document.find_path(&["module:m", "var:v"]).is_some());
    }

    #[test]
    fn test_lex_error_stops_every_stage() {
        let loader = DocumentLoader::from_string("var: \"open\n");
        assert!(matches!(loader.tokenize(), Err(ParseError::Lex(_))));
        assert!(matches!(loader.parse(), Err(ParseError::Lex(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"func: run\n  doc: Runs\n").unwrap();
        let loader = DocumentLoader::from_path(file.path()).unwrap();
        assert_eq!(loader.path(), Some(file.path()));
        assert_eq!(loader.parse().unwrap().len(), 1);
    }

    #[test]
    fn test_load_reports_both_failure_kinds() {
        let err = DocumentLoader::load("nowhere/missing.cst").unwrap_err();
        assert!(matches!(
            err,
            CodestructError::FileAccess(FileAccessError::NotFound { .. })
        ));
        assert!(err.range().is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"module: m\n    var: a\n  var: b\n").unwrap();
        let err = DocumentLoader::load(file.path()).unwrap_err();
        assert!(matches!(err, CodestructError::Lex(_)));
        assert_eq!(err.range().map(|range| range.start.line), Some(2));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x76, 0x61, 0x72, 0xff, 0xfe]).unwrap();
        let err = DocumentLoader::from_path(file.path()).unwrap_err();
        assert!(matches!(err, FileAccessError::Decode { .. }));
    }
}
