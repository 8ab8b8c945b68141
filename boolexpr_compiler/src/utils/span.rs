//! Source location tracking
//!
//! Every token and every syntax error carries a [`Span`] so callers can point
//! at the exact byte that failed. Offsets are byte offsets into the
//! normalized expression text; lines and columns are 1-based.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance position past one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position by a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Zero-width span at a position (used for end of input)
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Byte length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Source text covered by this span, or "" if it lies outside `input`
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input
            .get(self.start.offset..self.end.offset)
            .unwrap_or_default()
    }

    /// Underline this span beneath the line it starts on, compiler style
    pub fn render(&self, input: &str, message: &str) -> String {
        let line_text = input
            .lines()
            .nth(self.start.line.saturating_sub(1) as usize)
            .unwrap_or_default();
        let gutter = self.start.line.to_string();
        let padding = " ".repeat(gutter.len());
        let indent = " ".repeat(self.start.column.saturating_sub(1) as usize);
        let carets = "^".repeat(if self.start.line == self.end.line {
            (self.end.column.saturating_sub(self.start.column) as usize).max(1)
        } else {
            1
        });

        format!(
            "error: {message}\n{padding}--> {}\n{padding} |\n{gutter} | {line_text}\n{padding} | {indent}{carets}\n",
            self.start
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_utf8() {
        let pos = Position::start().advance('a').advance('\n').advance('é');
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_merge_and_slice() {
        let input = "alpha AND beta";
        let left = Span::new(Position::start(), Position::start().advance_str("alpha"));
        let right_start = Position::start().advance_str("alpha AND ");
        let right = Span::new(right_start, right_start.advance_str("beta"));

        let whole = left.merge(right);
        assert_eq!(whole.slice(input), input);
        assert_eq!(right.merge(left), whole);
        assert_eq!(whole.len(), input.len());
    }

    #[test]
    fn test_slice_out_of_range_is_empty() {
        let span = Span::new(Position::new(10, 1, 11), Position::new(12, 1, 13));
        assert_eq!(span.slice("short"), "");
    }

    #[test]
    fn test_render_points_at_column() {
        let start = Position::start().advance_str("a OR ");
        let span = Span::new(start, start.advance('&'));
        let rendered = span.render("a OR & b", "unexpected '&'");

        assert!(rendered.starts_with("error: unexpected '&'"));
        assert!(rendered.contains("--> 1:6"));
        assert!(rendered.contains("1 | a OR & b"));
        assert!(rendered.trim_end().ends_with("|      ^"));
    }
}
