//! Formatter options

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    #[default]
    TwoSpaces,
    FourSpaces,
    Tab,
}

impl IndentStyle {
    /// Whitespace for one level
    pub fn unit(self) -> &'static str {
        match self {
            IndentStyle::TwoSpaces => "  ",
            IndentStyle::FourSpaces => "    ",
            IndentStyle::Tab => "\t",
        }
    }
}

impl fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentStyle::TwoSpaces => write!(f, "2"),
            IndentStyle::FourSpaces => write!(f, "4"),
            IndentStyle::Tab => write!(f, "tab"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatConfigError {
    #[error("indent must be 2, 4 or tab, got '{0}'")]
    Indent(String),
    #[error("line range must look like START:END with 1 <= START <= END, got '{0}'")]
    LineRange(String),
}

impl FromStr for IndentStyle {
    type Err = FormatConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" => Ok(IndentStyle::TwoSpaces),
            "4" => Ok(IndentStyle::FourSpaces),
            "tab" | "tabs" => Ok(IndentStyle::Tab),
            other => Err(FormatConfigError::Indent(other.to_string())),
        }
    }
}

/// Zero-based lines, start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        LineRange { start, end }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line < self.end
    }
}

/// Parses the one-based inclusive form used on the command line, e.g. `3:10`
impl FromStr for LineRange {
    type Err = FormatConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatConfigError::LineRange(s.to_string());
        let (start, end) = s.split_once(':').ok_or_else(invalid)?;
        let start: usize = start.trim().parse().map_err(|_| invalid())?;
        let end: usize = end.trim().parse().map_err(|_| invalid())?;
        if start == 0 || end < start {
            return Err(invalid());
        }
        Ok(LineRange::new(start - 1, end))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatConfig {
    pub indent: IndentStyle,
    /// Add `doc:` lines to module, class and func entities that lack one
    pub placeholder_docs: bool,
    /// Rewrite PascalCase and UPPER_CASE attribute keys to camelCase
    pub fix_attribute_keys: bool,
    /// Only render the outermost entities declared in these lines
    pub range: Option<LineRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_from_str() {
        assert_eq!("2".parse::<IndentStyle>().unwrap(), IndentStyle::TwoSpaces);
        assert_eq!("4".parse::<IndentStyle>().unwrap(), IndentStyle::FourSpaces);
        assert_eq!("Tab".parse::<IndentStyle>().unwrap(), IndentStyle::Tab);
        assert!("3".parse::<IndentStyle>().is_err());
    }

    #[test]
    fn test_line_range_from_str() {
        let range: LineRange = "3:5".parse().unwrap();
        assert_eq!(range, LineRange::new(2, 5));
        assert!(range.contains(2) && range.contains(4));
        assert!(!range.contains(5));
        assert!("0:4".parse::<LineRange>().is_err());
        assert!("5:3".parse::<LineRange>().is_err());
        assert!("five".parse::<LineRange>().is_err());
    }
}
