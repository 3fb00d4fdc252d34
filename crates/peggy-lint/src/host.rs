//! The host adapter: parse a grammar into a `Program` plus its schema.

use peggy_ast::{Program, SCHEMA, Schema};
use peggy_parser::{ParseOptions, parse};
use tracing::debug;

use crate::config::LintConfig;
use crate::diagnostics::HostParseError;

/// Tracing target for host events.
pub const LINT_TARGET: &str = "peggy_lint";

/// Words that cannot label an expression, because labels become variables
/// in the generated JavaScript.
pub const RESERVED_WORDS: &[&str] = &[
    // ECMAScript 2015 keywords.
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    // Literals.
    "null",
    "true",
    "false",
    "enum",
    // Reserved in strict mode, which generated parsers use.
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
    // Reserved in module code.
    "await",
    // Legal names that break generated code.
    "arguments",
    "eval",
];

/// Per-call options for [`parse_for_host`].
///
/// # Example
///
/// ```
/// use peggy_lint::HostOptions;
///
/// let options = HostOptions::new().with_source_id("grammar.peggy");
/// assert_eq!(options.source_id(), Some("grammar.peggy"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostOptions {
    source_id: Option<String>,
}

impl HostOptions {
    /// Creates options without a source identifier.
    #[must_use]
    pub const fn new() -> Self {
        Self { source_id: None }
    }

    /// Names the file the text came from. Errors then carry an excerpt.
    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Returns the source identifier, if any.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }
}

/// A parsed grammar ready for linting.
#[derive(Debug, Clone)]
pub struct HostParse {
    /// The synthetic root wrapping the grammar and its comments.
    pub tree: Program,
    /// The registry describing every node kind in `tree`.
    pub schema: &'static Schema,
}

/// Parses grammars for a lint host using a fixed configuration.
///
/// # Example
///
/// ```
/// use peggy_lint::{HostOptions, LintConfig, ParserHost};
///
/// let host = ParserHost::new(LintConfig::default().with_extra_reserved_words(["rest"]));
/// assert!(host.parse("start = rest:'a'", &HostOptions::new()).is_err());
/// assert!(host.parse("start = tail:'a'", &HostOptions::new()).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserHost {
    config: LintConfig,
}

impl ParserHost {
    /// Creates a host using `config`.
    #[must_use]
    pub const fn new(config: LintConfig) -> Self {
        Self { config }
    }

    /// Returns the host configuration.
    #[must_use]
    pub const fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Returns the built-in reserved words followed by any configured extras.
    #[must_use]
    pub fn reserved_words(&self) -> impl Iterator<Item = &str> {
        RESERVED_WORDS.iter().copied().chain(
            self.config
                .extra_reserved_words()
                .iter()
                .map(String::as_str),
        )
    }

    /// Parses `text` into a [`HostParse`].
    ///
    /// # Errors
    ///
    /// Returns a [`HostParseError`] when `text` is not a valid grammar. The
    /// message includes a source excerpt when `options` names the source.
    pub fn parse(&self, text: &str, options: &HostOptions) -> Result<HostParse, HostParseError> {
        let mut parse_options = ParseOptions::new().with_reserved_words(self.reserved_words());
        if let Some(source_id) = options.source_id() {
            parse_options = parse_options.with_source_id(source_id);
        }

        match parse(text, &parse_options) {
            Ok(parsed) => {
                let tree = Program::wrap(parsed.grammar, parsed.comments);
                debug!(
                    target: LINT_TARGET,
                    source = options.source_id().unwrap_or("<anonymous>"),
                    rules = tree.body.rules.len(),
                    comments = tree.comments.len(),
                    "grammar ready for linting"
                );
                Ok(HostParse {
                    tree,
                    schema: &SCHEMA,
                })
            }
            Err(syntax) => {
                let error = HostParseError::new(syntax, text, self.config.context_lines());
                debug!(
                    target: LINT_TARGET,
                    source = options.source_id().unwrap_or("<anonymous>"),
                    line = error.line(),
                    column = error.column(),
                    "grammar rejected"
                );
                Err(error)
            }
        }
    }
}

/// Parses `text` with the default configuration.
///
/// # Errors
///
/// Returns a [`HostParseError`] when `text` is not a valid grammar.
///
/// # Example
///
/// ```
/// use peggy_lint::{HostOptions, NodeKind, parse_for_host};
///
/// let parsed = parse_for_host("start = 'a'", &HostOptions::new()).expect("valid grammar");
/// assert_eq!(parsed.tree.body.rules.len(), 1);
/// assert_eq!(parsed.schema.slots(NodeKind::Program), ["body", "comments"]);
///
/// let error = parse_for_host("foo='", &HostOptions::new()).expect_err("invalid grammar");
/// assert_eq!((error.line(), error.column()), (1, 6));
/// ```
pub fn parse_for_host(text: &str, options: &HostOptions) -> Result<HostParse, HostParseError> {
    ParserHost::default().parse(text, options)
}
