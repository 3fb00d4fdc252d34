//! Source span and position types for locating grammar regions.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A line and column position within a grammar source.
///
/// Both fields are one-indexed. Columns count Unicode scalar values, not
/// bytes, so they match what an editor displays for the line.
///
/// # Example
///
/// ```
/// use peggy_ast::LineCol;
///
/// let pos = LineCol::new(3, 7);
/// assert_eq!(pos.line(), 3);
/// assert_eq!(pos.column(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineCol {
    /// One-indexed line number.
    pub line: u32,
    /// One-indexed column number, counted in characters.
    pub column: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the one-indexed line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the one-indexed column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl Default for LineCol {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A byte and line/column span in a UTF-8 grammar source.
///
/// The byte range is half-open: `start_byte` is inclusive and `end_byte` is
/// exclusive. The `start` and `end` positions are derived from the byte
/// offsets and carried alongside them for diagnostics.
///
/// # Example
///
/// ```
/// use peggy_ast::{LineCol, Span};
///
/// let span = Span::new(4, 9, LineCol::new(1, 5), LineCol::new(1, 10));
/// assert_eq!(span.range(), 4..9);
/// assert!(span.contains(&Span::new(5, 6, LineCol::new(1, 6), LineCol::new(1, 7))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start_byte: usize,
    /// End byte offset (exclusive).
    pub end_byte: usize,
    /// Start position as line and column.
    pub start: LineCol,
    /// End position as line and column.
    pub end: LineCol,
}

impl Span {
    /// Creates a new span from byte offsets and line/column positions.
    #[must_use]
    pub const fn new(start_byte: usize, end_byte: usize, start: LineCol, end: LineCol) -> Self {
        Self {
            start_byte,
            end_byte,
            start,
            end,
        }
    }

    /// Returns the inclusive start byte offset.
    #[must_use]
    pub const fn start_byte(&self) -> usize {
        self.start_byte
    }

    /// Returns the exclusive end byte offset.
    #[must_use]
    pub const fn end_byte(&self) -> usize {
        self.end_byte
    }

    /// Returns the start line/column position.
    #[must_use]
    pub const fn start(&self) -> &LineCol {
        &self.start
    }

    /// Returns the end line/column position.
    #[must_use]
    pub const fn end(&self) -> &LineCol {
        &self.end
    }

    /// Returns the byte range covered by this span.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    /// Returns `true` when `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(&self, other: &Self) -> Self {
        let (start_byte, start) = if other.start_byte < self.start_byte {
            (other.start_byte, other.start)
        } else {
            (self.start_byte, self.start)
        };
        let (end_byte, end) = if other.end_byte > self.end_byte {
            (other.end_byte, other.end)
        } else {
            (self.end_byte, self.end)
        };
        Self::new(start_byte, end_byte, start, end)
    }
}

/// Converts byte offsets into one-indexed line/column positions.
///
/// Only `\n` terminates a line; a preceding `\r` is counted as an ordinary
/// column on the line it ends.
///
/// # Example
///
/// ```
/// use peggy_ast::{LineCol, LineIndex};
///
/// let index = LineIndex::new("start\n  = 'a'\n");
/// assert_eq!(index.line_col(8), LineCol::new(2, 3));
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex<'t> {
    text: &'t str,
    line_starts: Vec<usize>,
}

impl<'t> LineIndex<'t> {
    /// Indexes the line starts of `text`.
    #[must_use]
    pub fn new(text: &'t str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                text.char_indices()
                    .filter(|&(_, ch)| ch == '\n')
                    .map(|(offset, _)| offset + 1),
            )
            .collect();
        Self { text, line_starts }
    }

    /// Returns the indexed text.
    #[must_use]
    pub const fn text(&self) -> &'t str {
        self.text
    }

    /// Returns the position of the byte `offset`.
    ///
    /// Offsets past the end of the text are clamped to the end. Offsets that
    /// fall inside a multi-byte character count the partial character as a
    /// full column.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> LineCol {
        let clamped = offset.min(self.text.len());
        let line_index = self
            .line_starts
            .partition_point(|&start| start <= clamped)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line_index).copied().unwrap_or(0);
        let prefix = self.text.get(line_start..clamped).map_or_else(
            || lossy_prefix(self.text, line_start, clamped),
            |slice| slice.chars().count(),
        );
        LineCol::new(saturating_u32(line_index + 1), saturating_u32(prefix + 1))
    }

    /// Builds a span for the byte range `start..end`.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(start, end, self.line_col(start), self.line_col(end))
    }
}

fn lossy_prefix(text: &str, start: usize, end: usize) -> usize {
    text.char_indices()
        .filter(|&(offset, _)| offset >= start && offset < end)
        .count()
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
