//! Source location tracking.

/// A span of source text: byte offsets plus the 1-based line and column of
/// its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates an empty span at a position.
    #[must_use]
    pub const fn point(at: usize, line: u32, column: u32) -> Self {
        Self::new(at, at, line, column)
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            end: other.end,
            ..self
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Returns the full source line this span starts on.
    #[must_use]
    pub fn source_line<'a>(&self, source: &'a str) -> &'a str {
        let line_start = source[..self.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[self.start..]
            .find('\n')
            .map_or(source.len(), |i| self.start + i);
        &source[line_start..line_end]
    }
}
