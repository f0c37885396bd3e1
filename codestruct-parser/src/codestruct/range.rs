//! Position and location tracking for source code locations
//!
//! ## Types
//!
//! - [`Position`] - A zero-based line:column position (columns count bytes)
//! - [`Range`] - A source range with start/end positions and the byte span
//! - [`SourceLocation`] - Converts byte offsets to positions
//!
//! Every token, entity, attribute and diagnostic carries a `Range`. There are no null
//! locations; synthetic nodes (the document root, file-level diagnostics) use the default
//! range at (0, 0).
//!
//! `Display` renders positions one-based, the way editors and compilers report them.

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// A position in source code (line and column, both zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A location in source code (start and end positions plus the byte span)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Check if a position is contained within this location
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Build a bounding box that contains all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = ranges.next()?.clone();
        let mut span_start = first.span.start;
        let mut span_end = first.span.end;
        let mut start_pos = first.start;
        let mut end_pos = first.end;

        for range in ranges {
            if range.start < start_pos {
                start_pos = range.start;
                span_start = range.span.start;
            }
            if range.end > end_pos {
                end_pos = range.end;
                span_end = range.span.end;
            }
        }

        Some(Range::new(span_start..span_end, start_pos, end_pos))
    }

    /// Range spanning from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Range) -> Range {
        Range::new(self.span.start..other.span.end, self.start, other.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0..0, Position::default(), Position::default())
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        Position::new(line, byte_offset - self.line_starts[line])
    }

    /// Convert a byte range to a location
    pub fn range(&self, span: ByteRange<usize>) -> Range {
        let start = self.byte_to_position(span.start);
        let end = self.byte_to_position(span.end);
        Range::new(span, start, end)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(2, 4).to_string(), "3:5");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(0..10, Position::new(0, 0), Position::new(1, 3));
        assert!(range.contains(Position::new(0, 7)));
        assert!(range.contains(Position::new(1, 3)));
        assert!(!range.contains(Position::new(1, 4)));
    }

    #[test]
    fn test_bounding_box() {
        let a = Range::new(4..8, Position::new(0, 4), Position::new(0, 8));
        let b = Range::new(12..20, Position::new(1, 2), Position::new(1, 10));
        let bbox = Range::bounding_box([b.clone(), a.clone()].iter()).unwrap();
        assert_eq!(bbox.span, 4..20);
        assert_eq!(bbox.start, a.start);
        assert_eq!(bbox.end, b.end);
        assert!(Range::bounding_box(std::iter::empty()).is_none());
    }

    #[test]
    fn test_source_location_conversion() {
        let loc = SourceLocation::new("module: a\n  class: B\n");
        assert_eq!(loc.byte_to_position(0), Position::new(0, 0));
        assert_eq!(loc.byte_to_position(12), Position::new(1, 2));
        assert_eq!(loc.line_count(), 3);

        let range = loc.range(12..17);
        assert_eq!(range.start, Position::new(1, 2));
        assert_eq!(range.end, Position::new(1, 7));
    }
}
