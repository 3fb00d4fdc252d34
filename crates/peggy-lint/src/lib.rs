//! Host adapter for linting Peggy grammars.
//!
//! Parses grammar text into a [`Program`] rooted tree and hands it to the
//! host together with the node-kind [`Schema`], so that rules can walk the
//! tree with a [`Visitor`]. Syntax errors become [`HostParseError`]s that
//! expose the failing line and column and, when the source is named, a
//! rendered excerpt of the offending line.
//!
//! # Example
//!
//! ```
//! use peggy_lint::{HostOptions, NodeKind, Visitor, parse_for_host};
//!
//! let parsed = parse_for_host("start = 'a' / 'b'", &HostOptions::new()).expect("valid grammar");
//! let mut literals = 0;
//! Visitor::<()>::new()
//!     .on_enter(NodeKind::Literal, |_, _| {
//!         literals += 1;
//!         Ok(None)
//!     })
//!     .visit(&parsed.tree)
//!     .expect("infallible visit");
//! assert_eq!(literals, 2);
//! ```

mod config;
mod diagnostics;
mod host;
mod logging;
pub mod telemetry;

pub use config::{ConfigError, DEFAULT_LOG_FILTER, LintConfig};
pub use diagnostics::HostParseError;
pub use host::{HostOptions, HostParse, LINT_TARGET, ParserHost, RESERVED_WORDS, parse_for_host};
pub use logging::{LogFormat, LogFormatParseError};
pub use peggy_ast::{
    Context, Event, EventParseError, NodeId, NodeKind, NodeRef, Program, SCHEMA, Schema, Slot,
    Visitor,
};
pub use peggy_parser::{Expectation, SyntaxError};

#[cfg(test)]
mod tests;
