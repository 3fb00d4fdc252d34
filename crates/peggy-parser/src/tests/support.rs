//! Helpers shared by the recognizer tests.

use peggy_ast::{Expression, NodeKind, NodeRef};

use crate::{ParseOptions, ParsedGrammar, SyntaxError, parse};

pub(super) fn parse_ok(text: &str) -> ParsedGrammar {
    parse(text, &ParseOptions::new()).unwrap_or_else(|err| panic!("{text:?} should parse: {err}"))
}

pub(super) fn parse_err(text: &str, options: &ParseOptions) -> SyntaxError {
    match parse(text, options) {
        Ok(parsed) => panic!("{text:?} should not parse, got {parsed:?}"),
        Err(err) => err,
    }
}

/// Returns the expression of the first rule.
pub(super) fn first_expression(parsed: &ParsedGrammar) -> &Expression {
    &parsed
        .grammar
        .rules
        .first()
        .expect("grammar has at least one rule")
        .expression
}

pub(super) fn kind_of(expression: &Expression) -> NodeKind {
    NodeRef::from(expression).kind()
}
