//! Leaf-level nodes shared by the rest of the tree: names, punctuation,
//! code blocks, quoted strings and comments.

use serde::Serialize;

use crate::Span;

/// An identifier such as a rule name, label or import binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    /// The identifier text.
    pub value: String,
    /// Source span of the identifier.
    pub span: Span,
}

/// A punctuation token, kept so that lint rules can inspect spacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Punctuation {
    /// The token text, e.g. `=` or `..`.
    pub value: String,
    /// Source span of the token.
    pub span: Span,
}

/// A brace-delimited block of host-language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    /// The opening `{`.
    pub open: Punctuation,
    /// The code between the braces, verbatim.
    pub value: String,
    /// The closing `}`.
    pub close: Punctuation,
    /// Source span from `{` to `}` inclusive.
    pub span: Span,
}

/// A quoted string with its delimiters.
///
/// Used for import module specifiers, quoted export names and rule display
/// names. The node kind is decided by where the string sits in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedString {
    /// The opening quote.
    pub before: Punctuation,
    /// The unescaped string contents.
    pub value: String,
    /// The source text including quotes.
    pub raw: String,
    /// The closing quote.
    pub after: Punctuation,
    /// Source span including both quotes.
    pub span: Span,
}

/// The text of a comment, without its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentText {
    /// Comment body.
    pub value: String,
    /// Source span including the delimiters.
    pub span: Span,
}

/// A comment collected from anywhere in the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Comment {
    /// A `/* ... */` comment.
    Block(CommentText),
    /// A `// ...` comment.
    Line(CommentText),
}

impl Comment {
    /// Returns the comment body.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Block(text) | Self::Line(text) => &text.value,
        }
    }

    /// Returns the source span of the comment.
    #[must_use]
    pub const fn span(&self) -> &Span {
        match self {
            Self::Block(text) | Self::Line(text) => &text.span,
        }
    }
}
