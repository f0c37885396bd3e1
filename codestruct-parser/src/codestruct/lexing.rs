//! Lexer
//!
//! Turns source text into the flat token stream the parser consumes. The lexer works line
//! by line:
//!
//! 1. Blank lines are skipped. Comment-only lines become `Comment Newline` and never touch
//!    the indentation stack. They are held back until the next structural line, then
//!    placed among that line's Dedent tokens by their own indentation, so a comment
//!    indented at block level closes the block and a shallower one follows it.
//! 2. Any other line outside an open bracket goes through the [`indentation`] tracker,
//!    which emits `Indent` / `Dedent` tokens.
//! 3. A line starting with a triple-backtick fence is read as one atomic `CodeBlock`
//!    token up to the closing fence line, whatever the indentation in between.
//! 4. `doc:` lines keep their whole remainder as one `Docstring`; `impl:` lines may open a
//!    fence inline.
//! 5. Everything else is split by the logos lexer in [`base_tokenization`] and classified
//!    by [`classify`].
//!
//! While an attribute bracket is open, newlines are not statement terminators and the
//! next line's indentation is ignored.
//!
//! At end of input a final `Newline` (if missing) and one `Dedent` per open block are
//! emitted, so every `Indent` has a matching `Dedent`.

pub mod base_tokenization;
pub mod classify;
pub mod indentation;

use self::base_tokenization::RawToken;
use self::classify::LineClassifier;
use self::indentation::{IndentationTracker, LevelChange};
use super::error::LexError;
use super::range::{Position, Range};
use super::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

pub const FENCE: &str = "```";

static DOC_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^doc\s*:").expect("valid regex"));
static IMPL_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^impl\s*:").expect("valid regex"));

/// Tokenize CodeStruct source text
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(source).run()?;
    log::trace!("lexed {} tokens", tokens.len());
    Ok(tokens)
}

/// A physical line: byte offset of its start and its text without the line terminator
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    fn range(&self, start: usize, end: usize) -> Range {
        Range::new(
            self.offset + start..self.offset + end,
            Position::new(self.number, start),
            Position::new(self.number, end),
        )
    }

    fn indentation(&self) -> &'a str {
        let content = self.text.trim_start_matches([' ', '\t']);
        &self.text[..self.text.len() - content.len()]
    }
}

/// A comment line waiting for the next structural line
struct PendingComment {
    width: usize,
    comment: Token,
    newline: Token,
}

struct Lexer<'a> {
    lines: Vec<Line<'a>>,
    tokens: Vec<Token>,
    pending: Vec<PendingComment>,
    indentation: IndentationTracker,
    classifier: LineClassifier,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for (number, raw) in source.split('\n').enumerate() {
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            lines.push(Line {
                number,
                offset,
                text,
            });
            offset += raw.len() + 1;
        }
        Self {
            lines,
            tokens: Vec::new(),
            pending: Vec::new(),
            indentation: IndentationTracker::new(),
            classifier: LineClassifier::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut index = 0;
        while index < self.lines.len() {
            index = self.line(index)?;
        }
        self.finish();
        Ok(self.tokens)
    }

    /// Lex the line at `index`, returning the index of the next unread line
    fn line(&mut self, index: usize) -> Result<usize, LexError> {
        let line = self.lines[index];
        let indent = line.indentation();
        let content = line.text[indent.len()..].trim_end();
        let column = indent.len();

        if content.is_empty() {
            return Ok(index + 1);
        }

        if self.classifier.in_brackets() {
            if !content.starts_with('#') {
                self.classifier.start_line();
                self.inline(&line, column)?;
                self.end_statement(&line);
            }
            return Ok(index + 1);
        }

        if content.starts_with('#') {
            let end = line.text.len();
            self.pending.push(PendingComment {
                width: indent.chars().count(),
                comment: Token::new(
                    TokenKind::Comment,
                    content,
                    line.range(column, column + content.len()),
                ),
                newline: Token::new(TokenKind::Newline, "\n", line.range(end, end)),
            });
            return Ok(index + 1);
        }

        let levels = self.indentation.levels().to_vec();
        let change = self.indentation.advance(indent, &line.range(0, column))?;
        match change {
            LevelChange::Same => self.flush_comments(&[], line.range(0, column)),
            LevelChange::Indent => {
                self.push(TokenKind::Indent, "", line.range(0, column));
                self.flush_comments(&[], line.range(0, column));
            }
            LevelChange::Dedent(count) => {
                let popped = &levels[levels.len() - count..];
                self.flush_comments(popped, line.range(0, column));
            }
        }

        if content.starts_with(FENCE) {
            let next = self.code_block(index, column)?;
            let last = self.lines[next - 1];
            self.newline(&last);
            return Ok(next);
        }

        if let Some(marker) = DOC_LINE.find(content) {
            self.marker(&line, column, TokenKind::DocMarker, marker.end());
            let rest = &content[marker.end()..];
            let text = rest.trim();
            if !text.is_empty() {
                let start = column + marker.end() + (rest.len() - rest.trim_start().len());
                self.push(TokenKind::Docstring, text, line.range(start, start + text.len()));
            }
            self.newline(&line);
            return Ok(index + 1);
        }

        if let Some(marker) = IMPL_LINE.find(content) {
            self.marker(&line, column, TokenKind::ImplMarker, marker.end());
            let rest = &content[marker.end()..];
            let start = column + marker.end() + (rest.len() - rest.trim_start().len());
            if rest.trim_start().starts_with(FENCE) {
                let next = self.code_block(index, start)?;
                let last = self.lines[next - 1];
                self.newline(&last);
                return Ok(next);
            }
            self.classifier.start_line();
            self.inline(&line, start)?;
            self.end_statement(&line);
            return Ok(index + 1);
        }

        self.classifier.start_line();
        self.inline(&line, column)?;
        self.end_statement(&line);
        Ok(index + 1)
    }

    /// `doc` / `impl` marker followed by its colon
    fn marker(&mut self, line: &Line<'_>, column: usize, kind: TokenKind, end: usize) {
        let word_len = match kind {
            TokenKind::DocMarker => "doc".len(),
            _ => "impl".len(),
        };
        let word = &line.text[column..column + word_len];
        self.push(kind, word, line.range(column, column + word_len));
        self.push(
            TokenKind::Colon,
            ":",
            line.range(column + end - 1, column + end),
        );
    }

    /// Read a fenced block opening at `column` of line `index`. Returns the index of the
    /// line after the closing fence.
    fn code_block(&mut self, index: usize, column: usize) -> Result<usize, LexError> {
        let open = self.lines[index];
        let close = self.lines[index + 1..]
            .iter()
            .position(|line| line.text.trim() == FENCE)
            .map(|offset| index + 1 + offset)
            .ok_or_else(|| LexError::UnterminatedCodeBlock {
                range: open.range(column, column + FENCE.len()),
            })?;

        let last = self.lines[close];
        let mut text = String::from(open.text[column..].trim_end());
        for line in &self.lines[index + 1..=close] {
            text.push('\n');
            text.push_str(line.text);
        }
        let range = Range::new(
            open.offset + column..last.offset + last.text.len(),
            Position::new(open.number, column),
            Position::new(last.number, last.text.len()),
        );
        self.tokens.push(Token::new(TokenKind::CodeBlock, text, range));
        Ok(close + 1)
    }

    /// Run the logos lexer over `line` from `column` on
    fn inline(&mut self, line: &Line<'_>, column: usize) -> Result<(), LexError> {
        let rest = &line.text[column..];
        for (result, span) in base_tokenization::tokenize(rest) {
            let text = &rest[span.clone()];
            let range = line.range(column + span.start, column + span.end);
            let raw = match result {
                Ok(RawToken::UnterminatedString) => {
                    return Err(LexError::UnterminatedString { range })
                }
                Ok(raw) => raw,
                Err(()) => {
                    let ch = text.chars().next().unwrap_or('\0');
                    return Err(LexError::UnexpectedCharacter { ch, range });
                }
            };
            match self.classifier.classify(raw, text) {
                Some(kind) => self.push(kind, text.trim_end(), range),
                None => log::debug!("dropping comment inside brackets at {}", range),
            }
        }
        Ok(())
    }

    /// Emit held-back comments together with the Dedents for the closed `popped` levels.
    /// A comment goes after exactly those Dedents whose level is deeper than its own
    /// indentation.
    fn flush_comments(&mut self, popped: &[usize], range: Range) {
        let mut emitted = 0;
        for pending in std::mem::take(&mut self.pending) {
            let needed = popped.iter().filter(|level| **level > pending.width).count();
            while emitted < needed {
                self.push(TokenKind::Dedent, "", range.clone());
                emitted += 1;
            }
            self.tokens.push(pending.comment);
            self.tokens.push(pending.newline);
        }
        for _ in emitted..popped.len() {
            self.push(TokenKind::Dedent, "", range.clone());
        }
    }

    fn end_statement(&mut self, line: &Line<'_>) {
        if !self.classifier.in_brackets() {
            self.newline(line);
        }
    }

    fn newline(&mut self, line: &Line<'_>) {
        let end = line.text.len();
        self.push(TokenKind::Newline, "\n", line.range(end, end));
    }

    fn push(&mut self, kind: TokenKind, text: &str, range: Range) {
        self.tokens.push(Token::new(kind, text, range));
    }

    fn finish(&mut self) {
        let end = self
            .lines
            .last()
            .map(|line| line.range(line.text.len(), line.text.len()))
            .unwrap_or_default();
        if self
            .tokens
            .last()
            .is_some_and(|token| token.kind != TokenKind::Newline)
        {
            self.push(TokenKind::Newline, "\n", end.clone());
        }
        let popped = self.indentation.levels()[1..].to_vec();
        self.flush_comments(&popped, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("source should lex")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            kinds("module: m\n  class: C\n    func: f\n"),
            vec![
                Keyword, Colon, EntityName, Newline, Indent, Keyword, Colon, EntityName, Newline,
                Indent, Keyword, Colon, EntityName, Newline, Dedent, Dedent,
            ]
        );
    }

    #[test]
    fn test_missing_final_newline() {
        assert_eq!(
            kinds("var: x"),
            vec![Keyword, Colon, EntityName, Newline]
        );
    }

    #[test]
    fn test_comment_lines_do_not_touch_indentation() {
        assert_eq!(
            kinds("module: m\n      # deep comment\n  var: x\n"),
            vec![
                Keyword, Colon, EntityName, Newline, Indent, Comment, Newline, Keyword, Colon,
                EntityName, Newline, Dedent,
            ]
        );
    }

    #[test]
    fn test_comments_split_around_dedents() {
        let source = "module: m\n  class: C\n    var: v\n    # in C\n  # in m\n# top\nvar: w\n";
        let tokens = tokenize(source).unwrap();
        let shape: Vec<String> = tokens
            .iter()
            .filter(|t| matches!(t.kind, Comment | Dedent))
            .map(|t| match t.kind {
                Dedent => "<dedent>".to_string(),
                _ => t.text.clone(),
            })
            .collect();
        assert_eq!(
            shape,
            vec!["# in C", "<dedent>", "# in m", "<dedent>", "# top"]
        );
    }

    #[test]
    fn test_comments_at_end_of_input() {
        assert_eq!(
            kinds("module: m\n  var: v\n  # closing\n# bottom"),
            vec![
                Keyword, Colon, EntityName, Newline, Indent, Keyword, Colon, EntityName, Newline,
                Comment, Newline, Dedent, Comment, Newline,
            ]
        );
    }

    #[test]
    fn test_inconsistent_dedent_reports_line() {
        let err = tokenize("module: m\n    class: C\n  func: f\n").unwrap_err();
        assert!(matches!(err, LexError::InconsistentDedent { width: 2, .. }));
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_doc_line_is_one_token() {
        let tokens = tokenize("doc: Handles [weird]: stuff, & more # really\n").unwrap();
        assert_eq!(tokens[0].kind, DocMarker);
        assert_eq!(tokens[1].kind, Colon);
        assert_eq!(tokens[2].kind, Docstring);
        assert_eq!(tokens[2].text, "Handles [weird]: stuff, & more # really");
        assert_eq!(tokens[3].kind, Newline);
    }

    #[test]
    fn test_empty_doc_line() {
        assert_eq!(kinds("doc:\n"), vec![DocMarker, Colon, Newline]);
    }

    #[test]
    fn test_documents_keyword_is_not_doc() {
        assert_eq!(kinds("document: d\n")[0], Keyword);
    }

    #[test]
    fn test_code_block_on_own_line() {
        let source = "impl:\n  ```python\n  def f():\n      return 1\n  ```\nvar: x\n";
        let tokens = tokenize(source).unwrap();
        let code = tokens.iter().find(|t| t.kind == CodeBlock).unwrap();
        assert_eq!(
            code.text,
            "```python\n  def f():\n      return 1\n  ```"
        );
        assert_eq!(code.range.start, Position::new(1, 2));
        assert_eq!(code.range.end, Position::new(4, 5));
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                ImplMarker, Colon, Newline, Indent, CodeBlock, Newline, Dedent, Keyword, Colon,
                EntityName, Newline,
            ]
        );
    }

    #[test]
    fn test_code_block_ignores_internal_indentation() {
        let source = "impl: ```\nx = [1,\n        2]\n# not a comment\n```\n";
        assert_eq!(
            kinds(source),
            vec![ImplMarker, Colon, CodeBlock, Newline]
        );
    }

    #[test]
    fn test_unterminated_code_block() {
        let err = tokenize("impl:\n  ```rust\n  fn main() {}\n").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedCodeBlock { .. }));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("class: \"Open\n").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_multiline_attributes() {
        assert_eq!(
            kinds("func: f [a: 1,\n\n    # note\n        b: 2]\n  param: p\n"),
            vec![
                Keyword, Colon, EntityName, LBracket, AttrKey, Colon, NumberValue, Comma, AttrKey,
                Colon, NumberValue, RBracket, Newline, Indent, Keyword, Colon, EntityName,
                Newline, Dedent,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            kinds("module: m\r\n  var: x\r\n"),
            vec![Keyword, Colon, EntityName, Newline, Indent, Keyword, Colon, EntityName, Newline, Dedent]
        );
    }

    #[test]
    fn test_token_ranges() {
        let tokens = tokenize("module: m\n  class: Cls\n").unwrap();
        let name = tokens
            .iter()
            .find(|t| t.kind == EntityName && t.text == "Cls")
            .unwrap();
        assert_eq!(name.range.start, Position::new(1, 9));
        assert_eq!(name.range.span, 19..22);
    }
}
