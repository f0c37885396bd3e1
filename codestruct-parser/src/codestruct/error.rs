//! Error taxonomy
//!
//! - [`LexError`] and [`SyntaxError`] abort a parse and carry the exact failing range.
//! - [`FileAccessError`] covers reading sources from disk.
//! - [`ParseError`] is what parsing returns (lex or syntax), [`CodestructError`] unifies all
//!   three for callers that load files.
//!
//! Non-fatal findings are not errors; see [`crate::codestruct::linting::Diagnostic`].

use super::range::Range;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal at {range}")]
    UnterminatedString { range: Range },

    #[error("unterminated code block opened at {range}")]
    UnterminatedCodeBlock { range: Range },

    /// A dedent landed on a width that no enclosing block uses
    #[error("inconsistent dedent at line {}: indentation of {width} does not match any enclosing block", .range.start.line + 1)]
    InconsistentDedent { width: usize, range: Range },

    #[error("mixed tabs and spaces in indentation at {range}")]
    MixedIndentation { range: Range },

    #[error("unexpected character {ch:?} at {range}")]
    UnexpectedCharacter { ch: char, range: Range },
}

impl LexError {
    pub fn range(&self) -> &Range {
        match self {
            LexError::UnterminatedString { range }
            | LexError::UnterminatedCodeBlock { range }
            | LexError::InconsistentDedent { range, .. }
            | LexError::MixedIndentation { range }
            | LexError::UnexpectedCharacter { range, .. } => range,
        }
    }

    /// One-based line number, as shown in messages
    pub fn line(&self) -> usize {
        self.range().start.line + 1
    }
}

/// The parser found `found` where the grammar required `expected`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found} at {range}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: String,
    pub range: Range,
}

impl SyntaxError {
    pub fn new(expected: impl Into<String>, found: impl Into<String>, range: Range) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
            range,
        }
    }

    pub fn line(&self) -> usize {
        self.range.start.line + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    pub fn range(&self) -> &Range {
        match self {
            ParseError::Lex(err) => err.range(),
            ParseError::Syntax(err) => &err.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileAccessError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{} is not valid UTF-8: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("cannot read {}: {message}", .path.display())]
    Os { path: PathBuf, message: String },
}

impl FileAccessError {
    /// Classify an I/O failure for `path`
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FileAccessError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileAccessError::PermissionDenied { path },
            io::ErrorKind::InvalidData => FileAccessError::Decode {
                path,
                message: err.to_string(),
            },
            _ => FileAccessError::Os {
                path,
                message: err.to_string(),
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileAccessError::NotFound { path }
            | FileAccessError::PermissionDenied { path }
            | FileAccessError::Decode { path, .. }
            | FileAccessError::Os { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodestructError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    FileAccess(#[from] FileAccessError),
}

impl CodestructError {
    /// Source range of the failure; file access errors have none
    pub fn range(&self) -> Option<&Range> {
        match self {
            CodestructError::Lex(err) => Some(err.range()),
            CodestructError::Syntax(err) => Some(&err.range),
            CodestructError::FileAccess(_) => None,
        }
    }
}

impl From<ParseError> for CodestructError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => CodestructError::Lex(err),
            ParseError::Syntax(err) => CodestructError::Syntax(err),
        }
    }
}
