//! Structured syntax errors raised by the recognizer.

use peggy_ast::LineIndex;
use serde::Serialize;
use thiserror::Error;

use crate::expectation::Expectation;

/// A point in the grammar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// One-indexed line.
    pub line: u32,
    /// One-indexed column, counted in characters.
    pub column: u32,
}

impl Position {
    fn at(index: &LineIndex<'_>, offset: usize) -> Self {
        let point = index.line_col(offset);
        Self {
            offset,
            line: point.line,
            column: point.column,
        }
    }
}

/// The region an error refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    source: Option<String>,
    start: Position,
    end: Position,
}

impl Location {
    /// Creates a location spanning `start..end` in `source`.
    #[must_use]
    pub const fn new(source: Option<String>, start: Position, end: Position) -> Self {
        Self { source, start, end }
    }

    /// Returns the source identifier supplied by the caller, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns the first position covered.
    #[must_use]
    pub const fn start(&self) -> &Position {
        &self.start
    }

    /// Returns the position just past the region.
    #[must_use]
    pub const fn end(&self) -> &Position {
        &self.end
    }
}

/// A grammar that failed to parse.
///
/// The expectation set and found character describe the furthest position
/// the recognizer reached; the message is derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    message: String,
    expected: Vec<Expectation>,
    found: Option<char>,
    location: Location,
}

impl SyntaxError {
    /// Creates an error, rendering its message from `expected` and `found`.
    #[must_use]
    pub fn new(expected: Vec<Expectation>, found: Option<char>, location: Location) -> Self {
        Self {
            message: Expectation::message(&expected, found),
            expected,
            found,
            location,
        }
    }

    /// Returns the rendered `Expected … but … found.` message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns what would have been accepted at the failure position.
    #[must_use]
    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    /// Returns the character at the failure position, or `None` at the end
    /// of input.
    #[must_use]
    pub const fn found(&self) -> Option<char> {
        self.found
    }

    /// Returns where the error occurred.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    pub(crate) fn from_peg(
        failure: &peg::error::ParseError<peg::str::LineCol>,
        index: &LineIndex<'_>,
        source: Option<String>,
    ) -> Self {
        let offset = failure.location.offset;
        let found = index
            .text()
            .get(offset..)
            .and_then(|rest| rest.chars().next());
        let end = offset + found.map_or(0, char::len_utf8);
        let mut expected: Vec<Expectation> = failure
            .expected
            .tokens()
            .map(Expectation::from_peg_token)
            .collect();
        expected.sort_by_key(Expectation::describe);
        expected.dedup();
        if expected.is_empty() && found.is_some() {
            expected.push(Expectation::End);
        }
        Self::new(
            expected,
            found,
            Location::new(source, Position::at(index, offset), Position::at(index, end)),
        )
    }
}
