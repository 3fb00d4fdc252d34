//! Typed node definitions for every node kind.
//!
//! Each kind is a plain struct owning its children. Kinds that share a shape
//! share a payload type and are told apart by the enum variant or field that
//! holds them; [`NodeRef`](crate::NodeRef) carries the resolved kind.

mod expression;
mod grammar;
mod tokens;

pub use expression::{
    Action, Any, Boundaries, Boundary, BoundaryConstant, BoundaryFunction, BoundaryVariable,
    Choice, Class, ClassPart, Delimiter, Expression, Group, Labeled, LibraryRef, Literal, Named,
    Prefixed, Repeated, RuleRef, SemanticPredicate, Sequence, Suffixed,
};
pub use grammar::{
    Binding, BindingClause, ExportName, Grammar, GrammarImport, ImportClause, Initializer,
    Program, RenameClause, Rule, TopLevelInitializer,
};
pub use tokens::{Code, Comment, CommentText, Name, Punctuation, QuotedString};
