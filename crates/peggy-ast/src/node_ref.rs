//! Borrowed, kind-tagged views of nodes used by generic code.

use crate::kind::NodeKind;
use crate::nodes::{
    Action, Any, Binding, BindingClause, Boundaries, Boundary, BoundaryConstant, BoundaryFunction,
    BoundaryVariable, Choice, Class, Code, Comment, CommentText, Delimiter, ExportName,
    Expression, Grammar, GrammarImport, Group, ImportClause, Initializer, Labeled, LibraryRef,
    Literal, Name, Named, Prefixed, Program, Punctuation, QuotedString, RenameClause, Repeated,
    Rule, RuleRef, SemanticPredicate, Sequence, Suffixed, TopLevelInitializer,
};
use crate::span::Span;

/// A borrowed reference to any node, tagged with its kind.
///
/// Payload types shared between kinds (for example [`Prefixed`] for `text`,
/// `simple_and` and `simple_not`) are disambiguated by the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// `Program`
    Program(&'a Program),
    /// `grammar`
    Grammar(&'a Grammar),
    /// `grammar_import`
    GrammarImport(&'a GrammarImport),
    /// `binding`
    Binding(&'a Binding),
    /// `import_binding`
    ImportBinding(&'a BindingClause),
    /// `import_binding_all`
    ImportBindingAll(&'a BindingClause),
    /// `import_binding_default`
    ImportBindingDefault(&'a BindingClause),
    /// `import_binding_rename`
    ImportBindingRename(&'a RenameClause),
    /// `import_module_specifier`
    ImportModuleSpecifier(&'a QuotedString),
    /// `module_export_name`
    ModuleExportName(&'a QuotedString),
    /// `top_level_initializer`
    TopLevelInitializer(&'a TopLevelInitializer),
    /// `initializer`
    Initializer(&'a Initializer),
    /// `rule`
    Rule(&'a Rule),
    /// `named`
    Named(&'a Named),
    /// `repeated`
    Repeated(&'a Repeated),
    /// `boundaries`
    Boundaries(&'a Boundaries),
    /// `delimiter`
    Delimiter(&'a Delimiter),
    /// `constant`
    Constant(&'a BoundaryConstant),
    /// `variable`
    Variable(&'a BoundaryVariable),
    /// `function`
    Function(&'a BoundaryFunction),
    /// `choice`
    Choice(&'a Choice),
    /// `action`
    Action(&'a Action),
    /// `sequence`
    Sequence(&'a Sequence),
    /// `labeled`
    Labeled(&'a Labeled),
    /// `text`
    Text(&'a Prefixed),
    /// `simple_and`
    SimpleAnd(&'a Prefixed),
    /// `simple_not`
    SimpleNot(&'a Prefixed),
    /// `optional`
    Optional(&'a Suffixed),
    /// `zero_or_more`
    ZeroOrMore(&'a Suffixed),
    /// `one_or_more`
    OneOrMore(&'a Suffixed),
    /// `group`
    Group(&'a Group),
    /// `semantic_and`
    SemanticAnd(&'a SemanticPredicate),
    /// `semantic_not`
    SemanticNot(&'a SemanticPredicate),
    /// `library_ref`
    LibraryRef(&'a LibraryRef),
    /// `rule_ref`
    RuleRef(&'a RuleRef),
    /// `literal`
    Literal(&'a Literal),
    /// `display`
    Display(&'a QuotedString),
    /// `class`
    Class(&'a Class),
    /// `any`
    Any(&'a Any),
    /// `name`
    Name(&'a Name),
    /// `code`
    Code(&'a Code),
    /// `punc`
    Punc(&'a Punctuation),
    /// `Block`
    Block(&'a CommentText),
    /// `Line`
    Line(&'a CommentText),
}

/// The contents of one child slot of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<'a> {
    /// An optional child that is not present.
    Absent,
    /// A single child.
    Node(NodeRef<'a>),
    /// An ordered array of children, possibly empty.
    Nodes(Vec<NodeRef<'a>>),
}

impl<'a> Slot<'a> {
    fn one(node: impl Into<NodeRef<'a>>) -> Self {
        Self::Node(node.into())
    }

    fn optional<N>(node: Option<N>) -> Self
    where
        N: Into<NodeRef<'a>>,
    {
        node.map_or(Self::Absent, |child| Self::Node(child.into()))
    }

    fn many<N>(nodes: &'a [N]) -> Self
    where
        &'a N: Into<NodeRef<'a>>,
    {
        Self::Nodes(nodes.iter().map(Into::into).collect())
    }

    /// Returns the children held by the slot, in order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeRef<'a>] {
        match self {
            Self::Absent => &[],
            Self::Node(node) => std::slice::from_ref(node),
            Self::Nodes(nodes) => nodes,
        }
    }

    /// Returns `true` for array-valued slots.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Nodes(_))
    }
}

/// A stable identity for a node while its tree is borrowed.
///
/// Two distinct nodes of the same tree never share an id, so consumers can
/// key side tables of annotations by it during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    kind: NodeKind,
    address: usize,
}

impl NodeId {
    /// Returns the kind of the identified node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }
}

impl<'a> NodeRef<'a> {
    /// Returns the kind of the referenced node.
    #[must_use]
    pub const fn kind(self) -> NodeKind {
        match self {
            Self::Program(_) => NodeKind::Program,
            Self::Grammar(_) => NodeKind::Grammar,
            Self::GrammarImport(_) => NodeKind::GrammarImport,
            Self::Binding(_) => NodeKind::Binding,
            Self::ImportBinding(_) => NodeKind::ImportBinding,
            Self::ImportBindingAll(_) => NodeKind::ImportBindingAll,
            Self::ImportBindingDefault(_) => NodeKind::ImportBindingDefault,
            Self::ImportBindingRename(_) => NodeKind::ImportBindingRename,
            Self::ImportModuleSpecifier(_) => NodeKind::ImportModuleSpecifier,
            Self::ModuleExportName(_) => NodeKind::ModuleExportName,
            Self::TopLevelInitializer(_) => NodeKind::TopLevelInitializer,
            Self::Initializer(_) => NodeKind::Initializer,
            Self::Rule(_) => NodeKind::Rule,
            Self::Named(_) => NodeKind::Named,
            Self::Repeated(_) => NodeKind::Repeated,
            Self::Boundaries(_) => NodeKind::Boundaries,
            Self::Delimiter(_) => NodeKind::Delimiter,
            Self::Constant(_) => NodeKind::Constant,
            Self::Variable(_) => NodeKind::Variable,
            Self::Function(_) => NodeKind::Function,
            Self::Choice(_) => NodeKind::Choice,
            Self::Action(_) => NodeKind::Action,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Labeled(_) => NodeKind::Labeled,
            Self::Text(_) => NodeKind::Text,
            Self::SimpleAnd(_) => NodeKind::SimpleAnd,
            Self::SimpleNot(_) => NodeKind::SimpleNot,
            Self::Optional(_) => NodeKind::Optional,
            Self::ZeroOrMore(_) => NodeKind::ZeroOrMore,
            Self::OneOrMore(_) => NodeKind::OneOrMore,
            Self::Group(_) => NodeKind::Group,
            Self::SemanticAnd(_) => NodeKind::SemanticAnd,
            Self::SemanticNot(_) => NodeKind::SemanticNot,
            Self::LibraryRef(_) => NodeKind::LibraryRef,
            Self::RuleRef(_) => NodeKind::RuleRef,
            Self::Literal(_) => NodeKind::Literal,
            Self::Display(_) => NodeKind::Display,
            Self::Class(_) => NodeKind::Class,
            Self::Any(_) => NodeKind::Any,
            Self::Name(_) => NodeKind::Name,
            Self::Code(_) => NodeKind::Code,
            Self::Punc(_) => NodeKind::Punc,
            Self::Block(_) => NodeKind::Block,
            Self::Line(_) => NodeKind::Line,
        }
    }

    /// Returns the source span of the referenced node.
    #[must_use]
    pub const fn span(self) -> &'a Span {
        match self {
            Self::Program(node) => &node.span,
            Self::Grammar(node) => &node.span,
            Self::GrammarImport(node) => &node.span,
            Self::Binding(node) => &node.span,
            Self::ImportBinding(node)
            | Self::ImportBindingAll(node)
            | Self::ImportBindingDefault(node) => &node.span,
            Self::ImportBindingRename(node) => &node.span,
            Self::ImportModuleSpecifier(node)
            | Self::ModuleExportName(node)
            | Self::Display(node) => &node.span,
            Self::TopLevelInitializer(node) => &node.span,
            Self::Initializer(node) => &node.span,
            Self::Rule(node) => &node.span,
            Self::Named(node) => &node.span,
            Self::Repeated(node) => &node.span,
            Self::Boundaries(node) => &node.span,
            Self::Delimiter(node) => &node.span,
            Self::Constant(node) => &node.span,
            Self::Variable(node) => &node.span,
            Self::Function(node) => &node.span,
            Self::Choice(node) => &node.span,
            Self::Action(node) => &node.span,
            Self::Sequence(node) => &node.span,
            Self::Labeled(node) => &node.span,
            Self::Text(node) | Self::SimpleAnd(node) | Self::SimpleNot(node) => &node.span,
            Self::Optional(node) | Self::ZeroOrMore(node) | Self::OneOrMore(node) => &node.span,
            Self::Group(node) => &node.span,
            Self::SemanticAnd(node) | Self::SemanticNot(node) => &node.span,
            Self::LibraryRef(node) => &node.span,
            Self::RuleRef(node) => &node.span,
            Self::Literal(node) => &node.span,
            Self::Class(node) => &node.span,
            Self::Any(node) => &node.span,
            Self::Name(node) => &node.span,
            Self::Code(node) => &node.span,
            Self::Punc(node) => &node.span,
            Self::Block(node) | Self::Line(node) => &node.span,
        }
    }

    /// Returns the identity of the referenced node.
    #[must_use]
    pub fn id(self) -> NodeId {
        let address = match self {
            Self::Program(node) => std::ptr::from_ref(node).addr(),
            Self::Grammar(node) => std::ptr::from_ref(node).addr(),
            Self::GrammarImport(node) => std::ptr::from_ref(node).addr(),
            Self::Binding(node) => std::ptr::from_ref(node).addr(),
            Self::ImportBinding(node)
            | Self::ImportBindingAll(node)
            | Self::ImportBindingDefault(node) => std::ptr::from_ref(node).addr(),
            Self::ImportBindingRename(node) => std::ptr::from_ref(node).addr(),
            Self::ImportModuleSpecifier(node)
            | Self::ModuleExportName(node)
            | Self::Display(node) => std::ptr::from_ref(node).addr(),
            Self::TopLevelInitializer(node) => std::ptr::from_ref(node).addr(),
            Self::Initializer(node) => std::ptr::from_ref(node).addr(),
            Self::Rule(node) => std::ptr::from_ref(node).addr(),
            Self::Named(node) => std::ptr::from_ref(node).addr(),
            Self::Repeated(node) => std::ptr::from_ref(node).addr(),
            Self::Boundaries(node) => std::ptr::from_ref(node).addr(),
            Self::Delimiter(node) => std::ptr::from_ref(node).addr(),
            Self::Constant(node) => std::ptr::from_ref(node).addr(),
            Self::Variable(node) => std::ptr::from_ref(node).addr(),
            Self::Function(node) => std::ptr::from_ref(node).addr(),
            Self::Choice(node) => std::ptr::from_ref(node).addr(),
            Self::Action(node) => std::ptr::from_ref(node).addr(),
            Self::Sequence(node) => std::ptr::from_ref(node).addr(),
            Self::Labeled(node) => std::ptr::from_ref(node).addr(),
            Self::Text(node) | Self::SimpleAnd(node) | Self::SimpleNot(node) => {
                std::ptr::from_ref(node).addr()
            }
            Self::Optional(node) | Self::ZeroOrMore(node) | Self::OneOrMore(node) => {
                std::ptr::from_ref(node).addr()
            }
            Self::Group(node) => std::ptr::from_ref(node).addr(),
            Self::SemanticAnd(node) | Self::SemanticNot(node) => std::ptr::from_ref(node).addr(),
            Self::LibraryRef(node) => std::ptr::from_ref(node).addr(),
            Self::RuleRef(node) => std::ptr::from_ref(node).addr(),
            Self::Literal(node) => std::ptr::from_ref(node).addr(),
            Self::Class(node) => std::ptr::from_ref(node).addr(),
            Self::Any(node) => std::ptr::from_ref(node).addr(),
            Self::Name(node) => std::ptr::from_ref(node).addr(),
            Self::Code(node) => std::ptr::from_ref(node).addr(),
            Self::Punc(node) => std::ptr::from_ref(node).addr(),
            Self::Block(node) | Self::Line(node) => std::ptr::from_ref(node).addr(),
        };
        NodeId {
            kind: self.kind(),
            address,
        }
    }

    /// Returns the children held in the named slot.
    ///
    /// # Panics
    ///
    /// Panics when `slot` is not declared for this node's kind. Slot names
    /// come from [`NodeKind::slots`], so a panic means the registry and the
    /// node model disagree.
    #[must_use]
    pub fn slot(self, slot: &str) -> Slot<'a> {
        match (self, slot) {
            (Self::Program(node), "body") => Slot::one(&node.body),
            (Self::Program(node), "comments") => Slot::many(&node.comments),
            (Self::Grammar(node), "imports") => Slot::many(&node.imports),
            (Self::Grammar(node), "topLevelInitializer") => {
                Slot::optional(node.top_level_initializer.as_ref())
            }
            (Self::Grammar(node), "initializer") => Slot::optional(node.initializer.as_ref()),
            (Self::Grammar(node), "rules") => Slot::many(&node.rules),
            (Self::GrammarImport(node), "what") => Slot::many(&node.what),
            (Self::GrammarImport(node), "from") => {
                Slot::Node(Self::ImportModuleSpecifier(&node.from))
            }
            (Self::Binding(node), "id") => Slot::one(&node.id),
            (
                Self::ImportBinding(node)
                | Self::ImportBindingAll(node)
                | Self::ImportBindingDefault(node),
                "binding",
            ) => Slot::one(&node.binding),
            (Self::ImportBindingRename(node), "rename") => Slot::one(&node.rename),
            (Self::ImportBindingRename(node), "binding") => Slot::one(&node.binding),
            (
                Self::ImportModuleSpecifier(node)
                | Self::ModuleExportName(node)
                | Self::Display(node),
                "before",
            ) => Slot::one(&node.before),
            (
                Self::ImportModuleSpecifier(node)
                | Self::ModuleExportName(node)
                | Self::Display(node),
                "after",
            ) => Slot::one(&node.after),
            (Self::TopLevelInitializer(node), "open") => Slot::one(&node.open),
            (Self::TopLevelInitializer(node), "code") => Slot::one(&node.code),
            (Self::TopLevelInitializer(node), "close") => Slot::one(&node.close),
            (Self::TopLevelInitializer(node), "semi") => Slot::optional(node.semi.as_ref()),
            (Self::Initializer(node), "code") => Slot::one(&node.code),
            (Self::Initializer(node), "semi") => Slot::optional(node.semi.as_ref()),
            (Self::Rule(node), "name") => Slot::one(&node.name),
            (Self::Rule(node), "equals") => Slot::one(&node.equals),
            (Self::Rule(node), "expression") => Slot::one(&node.expression),
            (Self::Rule(node), "semi") => Slot::optional(node.semi.as_ref()),
            (Self::Named(node), "name") => Slot::Node(Self::Display(&node.name)),
            (Self::Named(node), "expression") => Slot::one(&node.expression),
            (Self::Repeated(node), "expression") => Slot::one(&node.expression),
            (Self::Repeated(node), "pipe1") => Slot::one(&node.pipe1),
            (Self::Repeated(node), "boundaries") => Slot::one(&node.boundaries),
            (Self::Repeated(node), "delimiter") => Slot::optional(node.delimiter.as_ref()),
            (Self::Repeated(node), "pipe2") => Slot::one(&node.pipe2),
            (Self::Boundaries(node), "min") => Slot::optional(node.min.as_ref()),
            (Self::Boundaries(node), "dots") => Slot::optional(node.dots.as_ref()),
            (Self::Boundaries(node), "max") => Slot::optional(node.max.as_ref()),
            (Self::Delimiter(node), "comma") => Slot::one(&node.comma),
            (Self::Delimiter(node), "expression") => Slot::one(&node.expression),
            (Self::Function(node), "code") => Slot::one(&node.code),
            (Self::Choice(node), "alternatives") => Slot::many(&node.alternatives),
            (Self::Choice(node), "slashes") => Slot::many(&node.slashes),
            (Self::Action(node), "expression") => Slot::one(&node.expression),
            (Self::Action(node), "code") => Slot::one(&node.code),
            (Self::Sequence(node), "elements") => Slot::many(&node.elements),
            (Self::Labeled(node), "at") => Slot::optional(node.at.as_ref()),
            (Self::Labeled(node), "name") => Slot::optional(node.name.as_ref()),
            (Self::Labeled(node), "colon") => Slot::optional(node.colon.as_ref()),
            (Self::Labeled(node), "expression") => Slot::one(&node.expression),
            (Self::Text(node) | Self::SimpleAnd(node) | Self::SimpleNot(node), "operator") => {
                Slot::one(&node.operator)
            }
            (Self::Text(node) | Self::SimpleAnd(node) | Self::SimpleNot(node), "expression") => {
                Slot::one(&node.expression)
            }
            (
                Self::Optional(node) | Self::ZeroOrMore(node) | Self::OneOrMore(node),
                "expression",
            ) => Slot::one(&node.expression),
            (
                Self::Optional(node) | Self::ZeroOrMore(node) | Self::OneOrMore(node),
                "operator",
            ) => Slot::one(&node.operator),
            (Self::Group(node), "open") => Slot::one(&node.open),
            (Self::Group(node), "expression") => Slot::one(&node.expression),
            (Self::Group(node), "close") => Slot::one(&node.close),
            (Self::SemanticAnd(node) | Self::SemanticNot(node), "operator") => {
                Slot::one(&node.operator)
            }
            (Self::SemanticAnd(node) | Self::SemanticNot(node), "code") => Slot::one(&node.code),
            (Self::LibraryRef(node), "name") => Slot::one(&node.name),
            (Self::LibraryRef(node), "library") => Slot::one(&node.library),
            (Self::RuleRef(node), "name") => Slot::one(&node.name),
            (Self::Literal(node), "before") => Slot::one(&node.before),
            (Self::Literal(node), "after") => Slot::one(&node.after),
            (Self::Code(node), "open") => Slot::one(&node.open),
            (Self::Code(node), "close") => Slot::one(&node.close),
            (node, name) => panic!("node kind `{}` has no slot `{name}`", node.kind()),
        }
    }

    /// Iterates over every declared slot of the node, in traversal order.
    pub fn children(self) -> impl Iterator<Item = (&'static str, Slot<'a>)> {
        self.kind()
            .slots()
            .iter()
            .map(move |&name| (name, self.slot(name)))
    }
}

macro_rules! node_ref_from {
    ($($variant:ident => $node:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $node> for NodeRef<'a> {
                fn from(node: &'a $node) -> Self {
                    Self::$variant(node)
                }
            }
        )*
    };
}

node_ref_from! {
    Program => Program,
    Grammar => Grammar,
    GrammarImport => GrammarImport,
    Binding => Binding,
    ImportBindingRename => RenameClause,
    TopLevelInitializer => TopLevelInitializer,
    Initializer => Initializer,
    Rule => Rule,
    Named => Named,
    Repeated => Repeated,
    Boundaries => Boundaries,
    Delimiter => Delimiter,
    Constant => BoundaryConstant,
    Variable => BoundaryVariable,
    Function => BoundaryFunction,
    Choice => Choice,
    Action => Action,
    Sequence => Sequence,
    Labeled => Labeled,
    Group => Group,
    LibraryRef => LibraryRef,
    RuleRef => RuleRef,
    Literal => Literal,
    Class => Class,
    Any => Any,
    Name => Name,
    Code => Code,
    Punc => Punctuation,
}

impl<'a> From<&'a Expression> for NodeRef<'a> {
    fn from(expression: &'a Expression) -> Self {
        match expression {
            Expression::Named(node) => Self::Named(node),
            Expression::Choice(node) => Self::Choice(node),
            Expression::Action(node) => Self::Action(node),
            Expression::Sequence(node) => Self::Sequence(node),
            Expression::Labeled(node) => Self::Labeled(node),
            Expression::Text(node) => Self::Text(node),
            Expression::SimpleAnd(node) => Self::SimpleAnd(node),
            Expression::SimpleNot(node) => Self::SimpleNot(node),
            Expression::Optional(node) => Self::Optional(node),
            Expression::ZeroOrMore(node) => Self::ZeroOrMore(node),
            Expression::OneOrMore(node) => Self::OneOrMore(node),
            Expression::Repeated(node) => Self::Repeated(node),
            Expression::Group(node) => Self::Group(node),
            Expression::SemanticAnd(node) => Self::SemanticAnd(node),
            Expression::SemanticNot(node) => Self::SemanticNot(node),
            Expression::RuleRef(node) => Self::RuleRef(node),
            Expression::LibraryRef(node) => Self::LibraryRef(node),
            Expression::Literal(node) => Self::Literal(node),
            Expression::Class(node) => Self::Class(node),
            Expression::Any(node) => Self::Any(node),
        }
    }
}

impl<'a> From<&'a Boundary> for NodeRef<'a> {
    fn from(boundary: &'a Boundary) -> Self {
        match boundary {
            Boundary::Constant(node) => Self::Constant(node),
            Boundary::Variable(node) => Self::Variable(node),
            Boundary::Function(node) => Self::Function(node),
        }
    }
}

impl<'a> From<&'a ImportClause> for NodeRef<'a> {
    fn from(clause: &'a ImportClause) -> Self {
        match clause {
            ImportClause::Named(node) => Self::ImportBinding(node),
            ImportClause::All(node) => Self::ImportBindingAll(node),
            ImportClause::Default(node) => Self::ImportBindingDefault(node),
            ImportClause::Rename(node) => Self::ImportBindingRename(node),
        }
    }
}

impl<'a> From<&'a ExportName> for NodeRef<'a> {
    fn from(name: &'a ExportName) -> Self {
        match name {
            ExportName::Name(node) => Self::Name(node),
            ExportName::Quoted(node) => Self::ModuleExportName(node),
        }
    }
}

impl<'a> From<&'a Comment> for NodeRef<'a> {
    fn from(comment: &'a Comment) -> Self {
        match comment {
            Comment::Block(node) => Self::Block(node),
            Comment::Line(node) => Self::Line(node),
        }
    }
}
