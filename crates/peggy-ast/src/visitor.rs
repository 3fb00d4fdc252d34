//! The generic traversal engine.
//!
//! A [`Visitor`] walks any node using the child slots declared by
//! [`NodeKind::slots`], calling sparse per-kind and wildcard callbacks on the
//! way in and on the way out. Enter callbacks may return a value which is
//! threaded down to every descendant until one of them produces its own.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use strum::EnumCount;

use crate::kind::NodeKind;
use crate::node_ref::{NodeRef, Slot};

type EnterCallback<'f, T, E> =
    Box<dyn for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<Option<T>, E> + 'f>;
type ExitCallback<'f, T, E> =
    Box<dyn for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<(), E> + 'f>;

/// Where a node sits in the walk, handed to every callback.
///
/// The root node has no slot and no parent. During exit callbacks
/// [`this_result`](Self::this_result) holds the value the node's own enter
/// phase settled on, which is the inherited value when no enter callback
/// ran.
#[derive(Debug)]
pub struct Context<'c, T> {
    slot: Option<&'static str>,
    is_array: bool,
    ancestors: &'c [NodeRef<'c>],
    parent_result: Option<&'c T>,
    this_result: Option<&'c T>,
}

impl<'c, T> Context<'c, T> {
    /// Returns the name of the parent slot holding this node.
    #[must_use]
    pub const fn slot(&self) -> Option<&'static str> {
        self.slot
    }

    /// Returns `true` when the node is an element of an array slot.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.is_array
    }

    /// Returns the parent node, absent at the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'c>> {
        self.ancestors.last().copied()
    }

    /// Returns every ancestor, root first.
    #[must_use]
    pub const fn ancestors(&self) -> &'c [NodeRef<'c>] {
        self.ancestors
    }

    /// Returns the closest ancestor of the given kind.
    #[must_use]
    pub fn nearest(&self, kind: NodeKind) -> Option<NodeRef<'c>> {
        self.ancestors
            .iter()
            .rev()
            .find(|ancestor| ancestor.kind() == kind)
            .copied()
    }

    /// Returns the value threaded down from the nearest ancestor that
    /// produced one.
    #[must_use]
    pub const fn parent_result(&self) -> Option<&'c T> {
        self.parent_result
    }

    /// Returns the node's own enter-phase value. Always absent on enter.
    #[must_use]
    pub const fn this_result(&self) -> Option<&'c T> {
        self.this_result
    }
}

/// A traversal event a callback can be registered for.
///
/// The string form matches the event names generic hosts use: `rule`,
/// `rule:exit`, `*` and `*:exit`.
///
/// # Example
///
/// ```
/// use peggy_ast::{Event, NodeKind};
///
/// let event: Event = "rule:exit".parse().expect("valid event");
/// assert_eq!(event, Event::Exit(NodeKind::Rule));
/// assert_eq!(Event::EnterAny.to_string(), "*");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Entering a node of the given kind.
    Enter(NodeKind),
    /// Leaving a node of the given kind.
    Exit(NodeKind),
    /// Entering any node.
    EnterAny,
    /// Leaving any node.
    ExitAny,
}

const WILDCARD: &str = "*";
const EXIT_SUFFIX: &str = ":exit";

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter(kind) => write!(f, "{kind}"),
            Self::Exit(kind) => write!(f, "{kind}{EXIT_SUFFIX}"),
            Self::EnterAny => f.write_str(WILDCARD),
            Self::ExitAny => write!(f, "{WILDCARD}{EXIT_SUFFIX}"),
        }
    }
}

/// Error returned when an event name names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visitor event `{event}`")]
pub struct EventParseError {
    event: String,
}

impl EventParseError {
    /// Returns the rejected event name.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl FromStr for Event {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, exit) = s
            .strip_suffix(EXIT_SUFFIX)
            .map_or((s, false), |tag| (tag, true));
        if tag == WILDCARD {
            return Ok(if exit { Self::ExitAny } else { Self::EnterAny });
        }
        let kind = tag.parse::<NodeKind>().map_err(|_| EventParseError {
            event: s.to_owned(),
        })?;
        Ok(if exit { Self::Exit(kind) } else { Self::Enter(kind) })
    }
}

/// A generic tree walker driven by the schema registry.
///
/// `T` is the accumulator threaded from parents to children; `E` is the
/// error a callback may abort the walk with. Both default to types that make
/// a plain "observe every node" visitor easy to write.
///
/// Enter order for every node is: wildcard enter, then kind-specific enter.
/// Both see the same inherited [`Context::parent_result`]; whichever runs
/// last decides the value the node's descendants see, including when it
/// returns `None`. Exit callbacks run only when a kind-specific or wildcard
/// exit is registered, kind-specific first.
///
/// The walk keeps its own stack instead of recursing, so tree depth is
/// limited only by available memory.
///
/// # Example
///
/// ```
/// use peggy_ast::{Any, NodeKind, NodeRef, Span, Visitor};
///
/// let dot = Any { span: Span::default() };
/// let mut seen = Vec::new();
/// Visitor::<()>::new()
///     .on_enter_any(|node, _| {
///         seen.push(node.kind());
///         Ok(None)
///     })
///     .visit(NodeRef::Any(&dot))
///     .expect("infallible");
/// assert_eq!(seen, [NodeKind::Any]);
/// ```
pub struct Visitor<'f, T = (), E = Infallible> {
    enter: Vec<Option<EnterCallback<'f, T, E>>>,
    exit: Vec<Option<ExitCallback<'f, T, E>>>,
    enter_any: Option<EnterCallback<'f, T, E>>,
    exit_any: Option<ExitCallback<'f, T, E>>,
}

impl<T, E> fmt::Debug for Visitor<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitor")
            .field("events", &self.events())
            .finish()
    }
}

impl<T, E> Default for Visitor<'_, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f, T, E> Visitor<'f, T, E> {
    /// Creates a visitor with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enter: std::iter::repeat_with(|| None).take(NodeKind::COUNT).collect(),
            exit: std::iter::repeat_with(|| None).take(NodeKind::COUNT).collect(),
            enter_any: None,
            exit_any: None,
        }
    }

    /// Registers the enter callback for `kind`, replacing any previous one.
    #[must_use]
    pub fn on_enter<F>(mut self, kind: NodeKind, callback: F) -> Self
    where
        F: for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<Option<T>, E> + 'f,
    {
        if let Some(entry) = self.enter.get_mut(kind.index()) {
            *entry = Some(Box::new(callback));
        }
        self
    }

    /// Registers the exit callback for `kind`, replacing any previous one.
    #[must_use]
    pub fn on_exit<F>(mut self, kind: NodeKind, callback: F) -> Self
    where
        F: for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<(), E> + 'f,
    {
        if let Some(entry) = self.exit.get_mut(kind.index()) {
            *entry = Some(Box::new(callback));
        }
        self
    }

    /// Registers the wildcard enter callback, run for every node.
    #[must_use]
    pub fn on_enter_any<F>(mut self, callback: F) -> Self
    where
        F: for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<Option<T>, E> + 'f,
    {
        self.enter_any = Some(Box::new(callback));
        self
    }

    /// Registers the wildcard exit callback, run for every node.
    #[must_use]
    pub fn on_exit_any<F>(mut self, callback: F) -> Self
    where
        F: for<'c> FnMut(NodeRef<'c>, &Context<'c, T>) -> Result<(), E> + 'f,
    {
        self.exit_any = Some(Box::new(callback));
        self
    }

    /// Lists the registered events: wildcards first, then per kind in
    /// declaration order with enter before exit.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        let wildcards = [
            self.enter_any.as_ref().map(|_| Event::EnterAny),
            self.exit_any.as_ref().map(|_| Event::ExitAny),
        ];
        let per_kind = NodeKind::all().flat_map(|kind| {
            let index = kind.index();
            let enter = self
                .enter
                .get(index)
                .and_then(Option::as_ref)
                .map(|_| Event::Enter(kind));
            let exit = self
                .exit
                .get(index)
                .and_then(Option::as_ref)
                .map(|_| Event::Exit(kind));
            [enter, exit]
        });
        wildcards.into_iter().chain(per_kind).flatten().collect()
    }

    /// Walks `root` and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a callback; no further callbacks
    /// run after it.
    pub fn visit<'a>(&mut self, root: impl Into<NodeRef<'a>>) -> Result<(), E> {
        self.visit_with(root, None)
    }

    /// Walks `root` with `parent_result` as the value inherited by the root.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a callback; no further callbacks
    /// run after it.
    pub fn visit_with<'a>(
        &mut self,
        root: impl Into<NodeRef<'a>>,
        parent_result: Option<T>,
    ) -> Result<(), E> {
        let mut walk = Walk {
            root_result: parent_result,
            frames: Vec::new(),
            producers: Vec::new(),
            ancestors: Vec::new(),
        };
        self.enter_node(&mut walk, root.into(), None, false)?;

        loop {
            let Some(top) = walk.frames.last_mut() else {
                return Ok(());
            };
            if let Some(child) = top.pending.next() {
                self.enter_node(&mut walk, child.node, Some(child.slot), child.is_array)?;
                continue;
            }
            if let Some(frame) = walk.pop() {
                self.exit_node(&walk, frame)?;
            }
        }
    }

    fn enter_node<'a>(
        &mut self,
        walk: &mut Walk<'a, T>,
        node: NodeRef<'a>,
        slot: Option<&'static str>,
        is_array: bool,
    ) -> Result<(), E> {
        let kind = node.kind();
        let produced = {
            let context = Context {
                slot,
                is_array,
                ancestors: &walk.ancestors,
                parent_result: walk.threaded(),
                this_result: None,
            };
            let mut produced = None;
            if let Some(callback) = self.enter_any.as_mut() {
                produced = Some(callback(node, &context)?);
            }
            if let Some(callback) = self.enter.get_mut(kind.index()).and_then(Option::as_mut) {
                produced = Some(callback(node, &context)?);
            }
            produced
        };

        walk.push(Frame {
            node,
            slot,
            is_array,
            produced,
            pending: pending_children(node).into_iter(),
        });
        Ok(())
    }

    fn exit_node(&mut self, walk: &Walk<'_, T>, frame: Frame<'_, T>) -> Result<(), E> {
        let kind = frame.node.kind();
        let has_specific = self
            .exit
            .get(kind.index())
            .is_some_and(Option::is_some);
        if !has_specific && self.exit_any.is_none() {
            return Ok(());
        }

        let parent_result = walk.threaded();
        let this_result = frame
            .produced
            .as_ref()
            .map_or(parent_result, Option::as_ref);
        let context = Context {
            slot: frame.slot,
            is_array: frame.is_array,
            ancestors: &walk.ancestors,
            parent_result,
            this_result,
        };
        if let Some(callback) = self.exit.get_mut(kind.index()).and_then(Option::as_mut) {
            callback(frame.node, &context)?;
        }
        if let Some(callback) = self.exit_any.as_mut() {
            callback(frame.node, &context)?;
        }
        Ok(())
    }
}

struct Walk<'a, T> {
    root_result: Option<T>,
    frames: Vec<Frame<'a, T>>,
    // Indices of the frames whose enter phase produced a value, innermost last.
    producers: Vec<usize>,
    ancestors: Vec<NodeRef<'a>>,
}

impl<'a, T> Walk<'a, T> {
    /// The value currently threaded to children of the top frame.
    fn threaded(&self) -> Option<&T> {
        match self.producers.last() {
            Some(&index) => self
                .frames
                .get(index)
                .and_then(|frame| frame.produced.as_ref())
                .and_then(Option::as_ref),
            None => self.root_result.as_ref(),
        }
    }

    fn push(&mut self, frame: Frame<'a, T>) {
        if frame.produced.is_some() {
            self.producers.push(self.frames.len());
        }
        self.ancestors.push(frame.node);
        self.frames.push(frame);
    }

    fn pop(&mut self) -> Option<Frame<'a, T>> {
        let frame = self.frames.pop()?;
        self.ancestors.pop();
        if self.producers.last() == Some(&self.frames.len()) {
            self.producers.pop();
        }
        Some(frame)
    }
}

struct Frame<'a, T> {
    node: NodeRef<'a>,
    slot: Option<&'static str>,
    is_array: bool,
    // `None` when no enter callback ran and the inherited value passes through.
    produced: Option<Option<T>>,
    pending: std::vec::IntoIter<Child<'a>>,
}

struct Child<'a> {
    node: NodeRef<'a>,
    slot: &'static str,
    is_array: bool,
}

fn pending_children(node: NodeRef<'_>) -> Vec<Child<'_>> {
    let mut children = Vec::new();
    for (slot, contents) in node.children() {
        match contents {
            Slot::Absent => {}
            Slot::Node(child) => children.push(Child {
                node: child,
                slot,
                is_array: false,
            }),
            Slot::Nodes(list) => children.extend(list.into_iter().map(|child| Child {
                node: child,
                slot,
                is_array: true,
            })),
        }
    }
    children
}
