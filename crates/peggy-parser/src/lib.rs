//! Recognizer for Peggy grammar sources.
//!
//! Turns grammar text into the [`peggy_ast::Grammar`] tree plus the stream
//! of comments found anywhere in the source. Failures are reported as a
//! [`SyntaxError`] carrying the set of [`Expectation`]s at the furthest
//! position the recognizer reached, with the message rendered the way
//! Peggy renders its own errors.
//!
//! # Example
//!
//! ```
//! use peggy_parser::{ParseOptions, parse};
//!
//! let parsed = parse("start = 'a' / 'b'", &ParseOptions::new()).expect("valid grammar");
//! assert_eq!(parsed.grammar.rules.len(), 1);
//!
//! let error = parse("foo='", &ParseOptions::new()).expect_err("unterminated literal");
//! assert_eq!(error.location().start().column, 6);
//! ```

mod builder;
mod error;
mod expectation;
mod grammar;
mod options;

use peggy_ast::{Comment, Grammar, LineIndex};
use tracing::debug;

pub use crate::builder::MAX_NESTING_DEPTH;
use crate::builder::Builder;
pub use crate::error::{Location, Position, SyntaxError};
pub use crate::expectation::{Expectation, class_escape, literal_escape};
pub use crate::options::ParseOptions;

/// Tracing target for recognizer events.
pub const PARSER_TARGET: &str = "peggy_parser";

/// Stack reserved for the recognizer, which recurses once per nesting level.
const RECOGNIZER_STACK_BYTES: usize = 32 * 1024 * 1024;

/// The result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGrammar {
    /// The grammar root.
    pub grammar: Grammar,
    /// Every comment in the source, in source order.
    pub comments: Vec<Comment>,
}

/// Parses `text` as a Peggy grammar.
///
/// Groups, repetition delimiters and braces inside code blocks may nest at
/// most [`MAX_NESTING_DEPTH`] levels deep. The recognizer runs on a stack
/// segment large enough for that depth, whatever the caller's stack.
///
/// # Errors
///
/// Returns a [`SyntaxError`] describing the furthest point the recognizer
/// reached when `text` is not a valid grammar, including input nested deeper
/// than [`MAX_NESTING_DEPTH`].
pub fn parse(text: &str, options: &ParseOptions) -> Result<ParsedGrammar, SyntaxError> {
    let source = options.source_id().unwrap_or("<anonymous>");
    debug!(target: PARSER_TARGET, source, bytes = text.len(), "parsing grammar");

    let builder = Builder::new(text, options.reserved_words());
    let outcome = stacker::maybe_grow(RECOGNIZER_STACK_BYTES, RECOGNIZER_STACK_BYTES, || {
        grammar::recognize(text, &builder)
    });
    match outcome {
        Ok(grammar) => {
            let comments = builder.into_comments();
            debug!(
                target: PARSER_TARGET,
                source,
                rules = grammar.rules.len(),
                imports = grammar.imports.len(),
                comments = comments.len(),
                "parsed grammar"
            );
            Ok(ParsedGrammar { grammar, comments })
        }
        Err(failure) => {
            let error = SyntaxError::from_peg(
                &failure,
                &LineIndex::new(text),
                options.source_id().map(str::to_owned),
            );
            debug!(
                target: PARSER_TARGET,
                source,
                line = error.location().start().line,
                column = error.location().start().column,
                "grammar failed to parse"
            );
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests;
