//! Indentation stack
//!
//! Turns the leading whitespace of each structural line into Indent / Dedent events.
//! The stack starts at `[0]`; a deeper line pushes its width, a shallower line pops until
//! the top matches. Popping past the width without landing on it is an inconsistent
//! dedent.
//!
//! Widths are counted in whitespace characters. A document may indent with spaces or with
//! tabs, never both.

use crate::codestruct::error::LexError;
use crate::codestruct::range::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Same,
    Indent,
    /// Number of blocks closed
    Dedent(usize),
}

#[derive(Debug)]
pub struct IndentationTracker {
    stack: Vec<usize>,
    indent_char: Option<char>,
}

impl IndentationTracker {
    pub fn new() -> Self {
        Self {
            stack: vec![0],
            indent_char: None,
        }
    }

    /// Feed the leading whitespace of a line. `range` covers that whitespace.
    pub fn advance(&mut self, leading: &str, range: &Range) -> Result<LevelChange, LexError> {
        let mut chars = leading.chars();
        if let Some(first) = chars.next() {
            if chars.any(|c| c != first) || self.indent_char.is_some_and(|c| c != first) {
                return Err(LexError::MixedIndentation {
                    range: range.clone(),
                });
            }
            self.indent_char = Some(first);
        }

        let width = leading.chars().count();
        let top = self.current();
        if width > top {
            self.stack.push(width);
            return Ok(LevelChange::Indent);
        }
        if width == top {
            return Ok(LevelChange::Same);
        }

        let mut closed = 0;
        while self.current() > width {
            self.stack.pop();
            closed += 1;
        }
        if self.current() != width {
            return Err(LexError::InconsistentDedent {
                width,
                range: range.clone(),
            });
        }
        Ok(LevelChange::Dedent(closed))
    }

    /// Widths of the open levels, base level first
    pub fn levels(&self) -> &[usize] {
        &self.stack
    }

    pub fn current(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    /// Blocks still open (excluding the base level)
    pub fn open_blocks(&self) -> usize {
        self.stack.len() - 1
    }
}

impl Default for IndentationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut IndentationTracker, leading: &str) -> Result<LevelChange, LexError> {
        tracker.advance(leading, &Range::default())
    }

    #[test]
    fn test_indent_and_dedent() {
        let mut tracker = IndentationTracker::new();
        assert_eq!(feed(&mut tracker, "").unwrap(), LevelChange::Same);
        assert_eq!(feed(&mut tracker, "  ").unwrap(), LevelChange::Indent);
        assert_eq!(feed(&mut tracker, "    ").unwrap(), LevelChange::Indent);
        assert_eq!(feed(&mut tracker, "    ").unwrap(), LevelChange::Same);
        assert_eq!(tracker.open_blocks(), 2);
        assert_eq!(feed(&mut tracker, "").unwrap(), LevelChange::Dedent(2));
        assert_eq!(tracker.open_blocks(), 0);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let mut tracker = IndentationTracker::new();
        feed(&mut tracker, "").unwrap();
        feed(&mut tracker, "    ").unwrap();
        let err = feed(&mut tracker, "  ").unwrap_err();
        assert!(matches!(err, LexError::InconsistentDedent { width: 2, .. }));
    }

    #[test]
    fn test_tabs_are_fine_on_their_own() {
        let mut tracker = IndentationTracker::new();
        assert_eq!(feed(&mut tracker, "\t").unwrap(), LevelChange::Indent);
        assert_eq!(feed(&mut tracker, "\t\t").unwrap(), LevelChange::Indent);
        assert_eq!(feed(&mut tracker, "").unwrap(), LevelChange::Dedent(2));
    }

    #[test]
    fn test_mixed_indentation_within_line() {
        let mut tracker = IndentationTracker::new();
        assert!(matches!(
            feed(&mut tracker, " \t"),
            Err(LexError::MixedIndentation { .. })
        ));
    }

    #[test]
    fn test_mixed_indentation_across_lines() {
        let mut tracker = IndentationTracker::new();
        feed(&mut tracker, "  ").unwrap();
        assert!(matches!(
            feed(&mut tracker, "\t"),
            Err(LexError::MixedIndentation { .. })
        ));
    }
}
