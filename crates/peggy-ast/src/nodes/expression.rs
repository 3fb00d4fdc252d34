//! Parsing expressions: everything that can appear on the right-hand side of
//! a rule.

use serde::Serialize;

use super::{Code, Name, Punctuation, QuotedString};
use crate::Span;

/// Any parsing expression.
///
/// Recursive variants are boxed. Variants that share a shape, such as the
/// three prefix operators, share a payload type; the variant decides the
/// node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    /// A rule body with a display name.
    Named(Box<Named>),
    /// `a / b / c`
    Choice(Box<Choice>),
    /// `expr { code }`
    Action(Box<Action>),
    /// `a b c`
    Sequence(Box<Sequence>),
    /// `label:expr` or `@expr`
    Labeled(Box<Labeled>),
    /// `$expr`
    Text(Box<Prefixed>),
    /// `&expr`
    SimpleAnd(Box<Prefixed>),
    /// `!expr`
    SimpleNot(Box<Prefixed>),
    /// `expr?`
    Optional(Box<Suffixed>),
    /// `expr*`
    ZeroOrMore(Box<Suffixed>),
    /// `expr+`
    OneOrMore(Box<Suffixed>),
    /// `expr|min..max, delim|`
    Repeated(Box<Repeated>),
    /// `( expr )`
    Group(Box<Group>),
    /// `&{ code }`
    SemanticAnd(SemanticPredicate),
    /// `!{ code }`
    SemanticNot(SemanticPredicate),
    /// `rule`
    RuleRef(RuleRef),
    /// `lib.rule`
    LibraryRef(LibraryRef),
    /// `"text"` or `'text'`, optionally followed by `i`.
    Literal(Literal),
    /// `[a-z]`
    Class(Class),
    /// `.`
    Any(Any),
}

impl Expression {
    /// Returns the source span of the expression.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Named(node) => &node.span,
            Self::Choice(node) => &node.span,
            Self::Action(node) => &node.span,
            Self::Sequence(node) => &node.span,
            Self::Labeled(node) => &node.span,
            Self::Text(node) | Self::SimpleAnd(node) | Self::SimpleNot(node) => &node.span,
            Self::Optional(node) | Self::ZeroOrMore(node) | Self::OneOrMore(node) => &node.span,
            Self::Repeated(node) => &node.span,
            Self::Group(node) => &node.span,
            Self::SemanticAnd(node) | Self::SemanticNot(node) => &node.span,
            Self::RuleRef(node) => &node.span,
            Self::LibraryRef(node) => &node.span,
            Self::Literal(node) => &node.span,
            Self::Class(node) => &node.span,
            Self::Any(node) => &node.span,
        }
    }
}

/// A rule body annotated with a human-readable name for error messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Named {
    /// The quoted display name.
    pub name: QuotedString,
    /// The rule body.
    pub expression: Expression,
    /// Span from the display name to the end of the body.
    pub span: Span,
}

/// Ordered alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Two or more alternatives, in source order.
    pub alternatives: Vec<Expression>,
    /// The `/` separators; always one fewer than the alternatives.
    pub slashes: Vec<Punctuation>,
    /// Span of the choice.
    pub span: Span,
}

/// An expression with an action block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// The matched expression.
    pub expression: Expression,
    /// The action code.
    pub code: Code,
    /// Span of the action.
    pub span: Span,
}

/// Expressions matched one after another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    /// Two or more elements, in source order.
    pub elements: Vec<Expression>,
    /// Span of the sequence.
    pub span: Span,
}

/// A labelled or plucked expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Labeled {
    /// The `@` pluck marker.
    pub at: Option<Punctuation>,
    /// The label, absent for a bare `@expr`.
    pub name: Option<Name>,
    /// The `:` after the label.
    pub colon: Option<Punctuation>,
    /// The labelled expression.
    pub expression: Expression,
    /// `true` when the expression is plucked with `@`.
    pub pick: bool,
    /// Span of the labelled expression.
    pub span: Span,
}

/// A prefix operator applied to an expression (`$`, `&` or `!`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefixed {
    /// The operator token.
    pub operator: Punctuation,
    /// The operand.
    pub expression: Expression,
    /// Span of the operator and operand.
    pub span: Span,
}

/// A suffix operator applied to an expression (`?`, `*` or `+`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suffixed {
    /// The operand.
    pub expression: Expression,
    /// The operator token.
    pub operator: Punctuation,
    /// Span of the operand and operator.
    pub span: Span,
}

/// A bounded repetition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repeated {
    /// The repeated expression.
    pub expression: Expression,
    /// The opening `|`.
    pub pipe1: Punctuation,
    /// The repetition bounds.
    pub boundaries: Boundaries,
    /// The optional delimiter clause.
    pub delimiter: Option<Delimiter>,
    /// The closing `|`.
    pub pipe2: Punctuation,
    /// Span of the repetition.
    pub span: Span,
}

/// Repetition bounds: `min..max`, `..max`, `min..`, `..` or an exact count.
///
/// An exact count is stored as `min` with neither `dots` nor `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundaries {
    /// The lower bound, or the exact count.
    pub min: Option<Boundary>,
    /// The `..` token.
    pub dots: Option<Punctuation>,
    /// The upper bound.
    pub max: Option<Boundary>,
    /// Span of the bounds.
    pub span: Span,
}

impl Boundaries {
    /// Returns `true` when the bounds are a single exact count.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.dots.is_none() && self.min.is_some()
    }
}

/// A single repetition bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Boundary {
    /// A literal count.
    Constant(BoundaryConstant),
    /// A label whose value is the count.
    Variable(BoundaryVariable),
    /// A code block computing the count.
    Function(BoundaryFunction),
}

/// A literal repetition count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryConstant {
    /// The count.
    pub value: u32,
    /// Span of the digits.
    pub span: Span,
}

/// A repetition count read from a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryVariable {
    /// The label name.
    pub value: String,
    /// Span of the label.
    pub span: Span,
}

/// A repetition count computed by code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryFunction {
    /// The code block.
    pub code: Code,
    /// Span of the code block.
    pub span: Span,
}

/// The `, expr` delimiter clause of a repetition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delimiter {
    /// The `,` token.
    pub comma: Punctuation,
    /// The delimiter expression.
    pub expression: Expression,
    /// Span of the clause.
    pub span: Span,
}

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// The `(` token.
    pub open: Punctuation,
    /// The inner expression.
    pub expression: Expression,
    /// The `)` token.
    pub close: Punctuation,
    /// Span of the group.
    pub span: Span,
}

/// A semantic predicate (`&{ code }` or `!{ code }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticPredicate {
    /// The `&` or `!` token.
    pub operator: Punctuation,
    /// The predicate code.
    pub code: Code,
    /// Span of the predicate.
    pub span: Span,
}

/// A reference to another rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRef {
    /// The referenced rule name.
    pub name: Name,
    /// Span of the reference.
    pub span: Span,
}

/// A reference to a rule exported by an imported grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    /// The referenced rule name.
    pub name: Name,
    /// The library namespace.
    pub library: Name,
    /// Index of the import declaring the library, when it is known.
    pub library_number: Option<usize>,
    /// Span of `library.name`.
    pub span: Span,
}

/// A string literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Literal {
    /// The opening quote.
    pub before: Punctuation,
    /// The unescaped contents.
    pub value: String,
    /// The source text including quotes.
    pub raw: String,
    /// The closing quote.
    pub after: Punctuation,
    /// `true` when followed by the `i` flag.
    pub ignore_case: bool,
    /// Span of the literal including any `i` flag.
    pub span: Span,
}

/// A character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Characters and ranges, in source order.
    pub parts: Vec<ClassPart>,
    /// `true` for `[^...]`.
    pub inverted: bool,
    /// `true` when followed by the `i` flag.
    pub ignore_case: bool,
    /// Span of the class including any `i` flag.
    pub span: Span,
}

/// One member of a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassPart {
    /// A single character.
    Char(char),
    /// An inclusive character range.
    Range(char, char),
}

impl ClassPart {
    /// Returns `true` when `ch` is a member of this part.
    #[must_use]
    pub fn matches(self, ch: char) -> bool {
        match self {
            Self::Char(member) => member == ch,
            Self::Range(low, high) => (low..=high).contains(&ch),
        }
    }
}

/// The `.` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Any {
    /// Span of the dot.
    pub span: Span,
}
