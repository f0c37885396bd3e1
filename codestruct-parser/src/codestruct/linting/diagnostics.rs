//! Diagnostics and their stable codes

use crate::codestruct::error::{FileAccessError, ParseError};
use crate::codestruct::range::Range;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    #[serde(rename = "info")]
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Stable diagnostic codes. The string form (`CS101`, ...) never changes meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticCode {
    #[serde(rename = "CS001")]
    ParseError,
    #[serde(rename = "CS002")]
    FileNotFound,
    #[serde(rename = "CS003")]
    PermissionDenied,
    #[serde(rename = "CS004")]
    DecodeError,
    #[serde(rename = "CS005")]
    OsError,
    #[serde(rename = "CS101")]
    NameTooShort,
    #[serde(rename = "CS201")]
    MissingDoc,
    #[serde(rename = "CS301")]
    HashIdFormat,
    #[serde(rename = "CS302")]
    MultipleHashIds,
    #[serde(rename = "CS401")]
    AttributeKeyNaming,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 10] = [
        DiagnosticCode::ParseError,
        DiagnosticCode::FileNotFound,
        DiagnosticCode::PermissionDenied,
        DiagnosticCode::DecodeError,
        DiagnosticCode::OsError,
        DiagnosticCode::NameTooShort,
        DiagnosticCode::MissingDoc,
        DiagnosticCode::HashIdFormat,
        DiagnosticCode::MultipleHashIds,
        DiagnosticCode::AttributeKeyNaming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "CS001",
            DiagnosticCode::FileNotFound => "CS002",
            DiagnosticCode::PermissionDenied => "CS003",
            DiagnosticCode::DecodeError => "CS004",
            DiagnosticCode::OsError => "CS005",
            DiagnosticCode::NameTooShort => "CS101",
            DiagnosticCode::MissingDoc => "CS201",
            DiagnosticCode::HashIdFormat => "CS301",
            DiagnosticCode::MultipleHashIds => "CS302",
            DiagnosticCode::AttributeKeyNaming => "CS401",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "parse",
            DiagnosticCode::FileNotFound
            | DiagnosticCode::PermissionDenied
            | DiagnosticCode::DecodeError
            | DiagnosticCode::OsError => "file",
            DiagnosticCode::NameTooShort => "naming",
            DiagnosticCode::MissingDoc => "documentation",
            DiagnosticCode::HashIdFormat | DiagnosticCode::MultipleHashIds => "hash",
            DiagnosticCode::AttributeKeyNaming => "attributes",
        }
    }

    pub fn default_severity(self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::ParseError
            | DiagnosticCode::FileNotFound
            | DiagnosticCode::PermissionDenied
            | DiagnosticCode::DecodeError
            | DiagnosticCode::OsError => DiagnosticSeverity::Error,
            DiagnosticCode::MultipleHashIds => DiagnosticSeverity::Information,
            DiagnosticCode::NameTooShort
            | DiagnosticCode::MissingDoc
            | DiagnosticCode::HashIdFormat
            | DiagnosticCode::AttributeKeyNaming => DiagnosticSeverity::Warning,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "Lex or syntax error",
            DiagnosticCode::FileNotFound => "File not found",
            DiagnosticCode::PermissionDenied => "Permission denied",
            DiagnosticCode::DecodeError => "File is not valid UTF-8",
            DiagnosticCode::OsError => "Operating system error while reading",
            DiagnosticCode::NameTooShort => "Entity name is too short",
            DiagnosticCode::MissingDoc => "Entity of a documented kind has no doc",
            DiagnosticCode::HashIdFormat => "Hash id is not a hexadecimal token",
            DiagnosticCode::MultipleHashIds => "Entity carries several hash ids",
            DiagnosticCode::AttributeKeyNaming => {
                "Attribute key is not camelCase or snake_case starting lowercase"
            }
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagnostic code `{0}`")]
pub struct UnknownCode(pub String);

impl FromStr for DiagnosticCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        DiagnosticCode::ALL
            .into_iter()
            .find(|code| code.as_str() == wanted)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

/// A non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub range: Range,
}

impl Diagnostic {
    /// New diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            range,
        }
    }

    pub fn from_parse_error(err: &ParseError) -> Self {
        Diagnostic::new(DiagnosticCode::ParseError, err.to_string(), err.range().clone())
    }

    pub fn from_file_error(err: &FileAccessError) -> Self {
        let code = match err {
            FileAccessError::NotFound { .. } => DiagnosticCode::FileNotFound,
            FileAccessError::PermissionDenied { .. } => DiagnosticCode::PermissionDenied,
            FileAccessError::Decode { .. } => DiagnosticCode::DecodeError,
            FileAccessError::Os { .. } => DiagnosticCode::OsError,
        };
        Diagnostic::new(code, err.to_string(), Range::default())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.range.start, self.severity, self.code, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_code_strings_round_trip() {
        for code in DiagnosticCode::ALL {
            assert_eq!(code.as_str().parse::<DiagnosticCode>().unwrap(), code);
        }
        assert_eq!("cs101".parse::<DiagnosticCode>().unwrap(), DiagnosticCode::NameTooShort);
        let err = "CS999".parse::<DiagnosticCode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown diagnostic code `CS999`");
    }

    #[test]
    fn test_serialized_code_is_stable_string() {
        let diagnostic = Diagnostic::new(DiagnosticCode::MissingDoc, "m", Range::default());
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "CS201");
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn test_file_errors_map_to_codes() {
        let err = FileAccessError::PermissionDenied {
            path: PathBuf::from("a.cst"),
        };
        let diagnostic = Diagnostic::from_file_error(&err);
        assert_eq!(diagnostic.code, DiagnosticCode::PermissionDenied);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(DiagnosticCode::NameTooShort, "too short", Range::default());
        assert_eq!(diagnostic.to_string(), "1:1: warning [CS101] too short");
    }
}
