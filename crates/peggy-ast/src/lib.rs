//! Syntax tree model, schema registry and traversal engine for Peggy
//! grammars.
//!
//! This crate defines every node a Peggy grammar parses into, the registry
//! that lists each node kind's ordered child slots, and a generic
//! [`Visitor`] that walks any tree using only that registry. It is
//! re-exported by the `peggy_lint` facade crate for stable public
//! consumption.
//!
//! # Core types
//!
//! - [`NodeKind`] and [`Schema`]: the 44 node kinds and their child slots
//! - [`Program`], [`Grammar`], [`Rule`] and [`Expression`]: the typed tree
//! - [`NodeRef`] and [`Slot`]: kind-tagged borrowed views for generic code
//! - [`Visitor`] and [`Context`]: the traversal engine
//! - [`Span`], [`LineCol`] and [`LineIndex`]: source positions
//!
//! # Example
//!
//! ```
//! use peggy_ast::{NodeKind, SCHEMA};
//!
//! assert_eq!(SCHEMA.len(), 44);
//! assert_eq!(SCHEMA.slots(NodeKind::Rule), ["name", "equals", "expression", "semi"]);
//! assert!(NodeKind::Punc.is_leaf());
//! ```

mod comparable;
mod kind;
mod node_ref;
mod nodes;
mod span;
mod visitor;

pub use comparable::{span_free_json, strip_spans};
pub use kind::{NodeKind, SCHEMA, Schema};
pub use node_ref::{NodeId, NodeRef, Slot};
pub use nodes::{
    Action, Any, Binding, BindingClause, Boundaries, Boundary, BoundaryConstant, BoundaryFunction,
    BoundaryVariable, Choice, Class, ClassPart, Code, Comment, CommentText, Delimiter, ExportName,
    Expression, Grammar, GrammarImport, Group, ImportClause, Initializer, Labeled, LibraryRef,
    Literal, Name, Named, Prefixed, Program, Punctuation, QuotedString, RenameClause, Repeated,
    Rule, RuleRef, SemanticPredicate, Sequence, Suffixed, TopLevelInitializer,
};
pub use span::{LineCol, LineIndex, Span};
pub use visitor::{Context, Event, EventParseError, Visitor};

#[cfg(test)]
mod tests;
