//! Node kinds and the schema registry describing their child slots.

use serde::{Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// The discriminant of every node in a Peggy grammar tree.
///
/// The string form of each variant is the tag used in event names and in
/// serialized trees, e.g. `zero_or_more` or `Program`.
///
/// # Example
///
/// ```
/// use peggy_ast::NodeKind;
///
/// let kind: NodeKind = "zero_or_more".parse().expect("known tag");
/// assert_eq!(kind, NodeKind::ZeroOrMore);
/// assert_eq!(kind.slots(), ["expression", "operator"]);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    /// Synthetic root wrapping the grammar and its comments.
    #[strum(to_string = "Program")]
    Program,
    /// A complete grammar file.
    Grammar,
    /// An `import ... from "..."` declaration.
    GrammarImport,
    /// The local name bound by an import clause.
    Binding,
    /// A named import without renaming (`{ rule }`).
    ImportBinding,
    /// A namespace import (`* as lib`).
    ImportBindingAll,
    /// A default import (`import rule from`).
    ImportBindingDefault,
    /// A renamed named import (`{ rule as local }`).
    ImportBindingRename,
    /// The quoted module path of an import.
    ImportModuleSpecifier,
    /// A quoted export name inside a renamed import.
    ModuleExportName,
    /// A `{{ ... }}` block run once per generated parser.
    TopLevelInitializer,
    /// A `{ ... }` block run once per parse.
    Initializer,
    /// A rule definition.
    Rule,
    /// A rule expression carrying a human-readable display name.
    Named,
    /// A bounded repetition (`expr|min..max, delim|`).
    Repeated,
    /// The bounds of a repetition.
    Boundaries,
    /// The delimiter clause of a repetition.
    Delimiter,
    /// A numeric repetition bound.
    Constant,
    /// A repetition bound naming a label.
    Variable,
    /// A repetition bound computed by a code block.
    Function,
    /// Ordered alternatives separated by `/`.
    Choice,
    /// An expression followed by an action code block.
    Action,
    /// Two or more expressions matched in order.
    Sequence,
    /// A labelled or plucked (`@`) expression.
    Labeled,
    /// A `$` expression returning matched text.
    Text,
    /// A `&` positive lookahead.
    SimpleAnd,
    /// A `!` negative lookahead.
    SimpleNot,
    /// A `?` suffix.
    Optional,
    /// A `*` suffix.
    ZeroOrMore,
    /// A `+` suffix.
    OneOrMore,
    /// A parenthesized expression.
    Group,
    /// A `&{ ... }` semantic predicate.
    SemanticAnd,
    /// A `!{ ... }` semantic predicate.
    SemanticNot,
    /// A reference to a rule in an imported library (`lib.rule`).
    LibraryRef,
    /// A reference to a rule in the same grammar.
    RuleRef,
    /// A quoted string literal.
    Literal,
    /// The quoted display name of a rule.
    Display,
    /// A character class.
    Class,
    /// The `.` wildcard.
    Any,
    /// An identifier.
    Name,
    /// A code block with its braces.
    Code,
    /// A punctuation token.
    Punc,
    /// A `/* ... */` comment.
    #[strum(to_string = "Block")]
    Block,
    /// A `// ...` comment.
    #[strum(to_string = "Line")]
    Line,
}

impl NodeKind {
    /// Returns the tag string of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns a dense index in `0..NodeKind::COUNT`, suitable for tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns every kind in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Returns the ordered child slot names of this kind.
    ///
    /// Children are visited in exactly this order. Kinds without node-valued
    /// fields return an empty slice.
    #[must_use]
    pub const fn slots(self) -> &'static [&'static str] {
        match self {
            Self::Program => &["body", "comments"],
            Self::Grammar => &["imports", "topLevelInitializer", "initializer", "rules"],
            Self::GrammarImport => &["what", "from"],
            Self::Binding => &["id"],
            Self::ImportBinding | Self::ImportBindingAll | Self::ImportBindingDefault => {
                &["binding"]
            }
            Self::ImportBindingRename => &["rename", "binding"],
            Self::ImportModuleSpecifier
            | Self::ModuleExportName
            | Self::Literal
            | Self::Display => &["before", "after"],
            Self::TopLevelInitializer => &["open", "code", "close", "semi"],
            Self::Initializer => &["code", "semi"],
            Self::Rule => &["name", "equals", "expression", "semi"],
            Self::Named => &["name", "expression"],
            Self::Repeated => &["expression", "pipe1", "boundaries", "delimiter", "pipe2"],
            Self::Boundaries => &["min", "dots", "max"],
            Self::Delimiter => &["comma", "expression"],
            Self::Function => &["code"],
            Self::Choice => &["alternatives", "slashes"],
            Self::Action => &["expression", "code"],
            Self::Sequence => &["elements"],
            Self::Labeled => &["at", "name", "colon", "expression"],
            Self::Text | Self::SimpleAnd | Self::SimpleNot => &["operator", "expression"],
            Self::Optional | Self::ZeroOrMore | Self::OneOrMore => &["expression", "operator"],
            Self::Group => &["open", "expression", "close"],
            Self::SemanticAnd | Self::SemanticNot => &["operator", "code"],
            Self::LibraryRef => &["name", "library"],
            Self::RuleRef => &["name"],
            Self::Code => &["open", "close"],
            Self::Constant
            | Self::Variable
            | Self::Class
            | Self::Any
            | Self::Name
            | Self::Punc
            | Self::Block
            | Self::Line => &[],
        }
    }

    /// Returns `true` when this kind has no child slots.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        self.slots().is_empty()
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The schema registry: every node kind with its ordered child slots.
///
/// A host receives the shared [`SCHEMA`] instance alongside each parsed tree
/// so that it can walk nodes it knows nothing else about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    _private: (),
}

/// The process-wide schema instance.
pub static SCHEMA: Schema = Schema { _private: () };

impl Schema {
    /// Returns the ordered slot names declared for `kind`.
    #[must_use]
    pub const fn slots(&self, kind: NodeKind) -> &'static [&'static str] {
        kind.slots()
    }

    /// Looks up the slots declared for a tag string.
    ///
    /// Returns `None` for tags that name no known kind.
    #[must_use]
    pub fn slots_for_tag(&self, tag: &str) -> Option<&'static [&'static str]> {
        tag.parse::<NodeKind>().ok().map(NodeKind::slots)
    }

    /// Iterates over every `(kind, slots)` pair in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (NodeKind, &'static [&'static str])> {
        NodeKind::all().map(|kind| (kind, kind.slots()))
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub const fn len(&self) -> usize {
        NodeKind::COUNT
    }

    /// Always `false`: the registry covers every kind.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        NodeKind::COUNT == 0
    }

    /// Renders the registry as a JSON object mapping tags to slot arrays.
    ///
    /// This is the shape generic hosts expect for their visitor-key tables.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.entries()
            .map(|(kind, slots)| {
                let names = slots
                    .iter()
                    .map(|slot| serde_json::Value::from(*slot))
                    .collect();
                (kind.as_str().to_owned(), serde_json::Value::Array(names))
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}
