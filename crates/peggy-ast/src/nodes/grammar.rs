//! Top-level grammar structure: the synthetic root, imports, initializers
//! and rules.

use serde::Serialize;

use super::{Code, Comment, Expression, Name, Punctuation, QuotedString};
use crate::Span;

/// Synthetic root wrapping a parsed grammar and its comment stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// The grammar itself.
    pub body: Grammar,
    /// Every comment in the source, in source order.
    pub comments: Vec<Comment>,
    /// Span covering the grammar and every comment.
    pub span: Span,
}

impl Program {
    /// Wraps a grammar root and its comments under a synthetic root.
    ///
    /// The root span covers the grammar and every comment, so the containment
    /// invariant holds for comments that sit outside the grammar's own span.
    ///
    /// # Example
    ///
    /// ```
    /// use peggy_ast::{Grammar, Program, Span};
    ///
    /// let grammar = Grammar {
    ///     imports: Vec::new(),
    ///     top_level_initializer: None,
    ///     initializer: None,
    ///     rules: Vec::new(),
    ///     span: Span::default(),
    /// };
    /// let program = Program::wrap(grammar.clone(), Vec::new());
    /// assert_eq!(program.body, grammar);
    /// ```
    #[must_use]
    pub fn wrap(body: Grammar, comments: Vec<Comment>) -> Self {
        let span = comments
            .iter()
            .fold(body.span.clone(), |acc, comment| acc.cover(comment.span()));
        Self {
            body,
            comments,
            span,
        }
    }
}

/// A complete grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    /// Import declarations, in source order.
    pub imports: Vec<GrammarImport>,
    /// The optional `{{ ... }}` block.
    pub top_level_initializer: Option<TopLevelInitializer>,
    /// The optional `{ ... }` block.
    pub initializer: Option<Initializer>,
    /// Rule definitions, in source order.
    pub rules: Vec<Rule>,
    /// Span of the whole grammar.
    pub span: Span,
}

impl Grammar {
    /// Finds a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name.value == name)
    }
}

/// An `import ... from "module"` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarImport {
    /// The import clauses; empty for a bare `import "module"`.
    pub what: Vec<ImportClause>,
    /// The quoted module specifier.
    pub from: QuotedString,
    /// Span of the declaration including any trailing `;`.
    pub span: Span,
}

/// One clause of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ImportClause {
    /// `{ rule }`
    #[serde(rename = "import_binding")]
    Named(BindingClause),
    /// `* as lib`
    #[serde(rename = "import_binding_all")]
    All(BindingClause),
    /// `rule` before any braces.
    #[serde(rename = "import_binding_default")]
    Default(BindingClause),
    /// `{ rule as local }`
    #[serde(rename = "import_binding_rename")]
    Rename(RenameClause),
}

impl ImportClause {
    /// Returns the local binding introduced by this clause.
    #[must_use]
    pub const fn binding(&self) -> &Binding {
        match self {
            Self::Named(clause) | Self::All(clause) | Self::Default(clause) => &clause.binding,
            Self::Rename(clause) => &clause.binding,
        }
    }
}

/// An import clause that binds a single local name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingClause {
    /// The local binding.
    pub binding: Binding,
    /// Span of the clause.
    pub span: Span,
}

/// A `{ exported as local }` import clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameClause {
    /// The exported name being imported.
    pub rename: ExportName,
    /// The local binding.
    pub binding: Binding,
    /// Span of the clause.
    pub span: Span,
}

/// The exported name in a renamed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExportName {
    /// A bare identifier.
    Name(Name),
    /// A quoted string, allowing names that are not identifiers.
    Quoted(QuotedString),
}

/// A local name bound by an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// The bound identifier.
    pub id: Name,
    /// Span of the binding.
    pub span: Span,
}

/// The `{{ ... }}` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelInitializer {
    /// The outer opening `{`.
    pub open: Punctuation,
    /// The inner code block.
    pub code: Code,
    /// The outer closing `}`.
    pub close: Punctuation,
    /// Optional trailing `;`.
    pub semi: Option<Punctuation>,
    /// Span of the block.
    pub span: Span,
}

/// The `{ ... }` per-parse initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Initializer {
    /// The code block.
    pub code: Code,
    /// Optional trailing `;`.
    pub semi: Option<Punctuation>,
    /// Span of the initializer.
    pub span: Span,
}

/// A rule definition: `name "display" = expression ;`.
///
/// A display name, when present, is carried by a [`Named`](super::Named)
/// expression wrapping the rule body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// The rule name.
    pub name: Name,
    /// The `=` token.
    pub equals: Punctuation,
    /// The rule body.
    pub expression: Expression,
    /// Optional trailing `;`.
    pub semi: Option<Punctuation>,
    /// Span of the rule.
    pub span: Span,
}
