//! Node construction shared by the grammar actions.
//!
//! The builder owns everything the actions need beyond the matched text:
//! the line index for spans, the reserved label words, the comments seen so
//! far and the namespace imports used to resolve library references.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

use peggy_ast::{
    Comment, CommentText, ImportClause, LineIndex, Name, Punctuation, QuotedString, Span,
};

pub(crate) struct Builder<'t> {
    index: LineIndex<'t>,
    reserved: HashSet<&'t str>,
    comments: RefCell<BTreeMap<usize, Comment>>,
    imports: Cell<usize>,
    libraries: RefCell<Vec<(String, usize)>>,
    depth: Cell<usize>,
}

/// Deepest nesting of groups, delimiters and code braces the recognizer
/// accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

pub(crate) const NESTING_EXPECTATION: &str = "nesting at most 256 levels deep";

impl<'t> Builder<'t> {
    pub(crate) fn new(text: &'t str, reserved: &'t [String]) -> Self {
        Self {
            index: LineIndex::new(text),
            reserved: reserved.iter().map(String::as_str).collect(),
            comments: RefCell::new(BTreeMap::new()),
            imports: Cell::new(0),
            libraries: RefCell::new(Vec::new()),
            depth: Cell::new(0),
        }
    }

    pub(crate) fn span(&self, start: usize, end: usize) -> Span {
        self.index.span(start, end)
    }

    pub(crate) fn punc(&self, start: usize, value: &str) -> Punctuation {
        Punctuation {
            value: value.to_owned(),
            span: self.span(start, start + value.len()),
        }
    }

    pub(crate) fn name(&self, start: usize, value: &str) -> Name {
        Name {
            value: value.to_owned(),
            span: self.span(start, start + value.len()),
        }
    }

    pub(crate) fn quoted(
        &self,
        (start, end): (usize, usize),
        before: Punctuation,
        chars: Vec<Option<char>>,
        after: Punctuation,
    ) -> QuotedString {
        QuotedString {
            before,
            value: chars.into_iter().flatten().collect(),
            raw: self
                .index
                .text()
                .get(start..end)
                .unwrap_or_default()
                .to_owned(),
            after,
            span: self.span(start, end),
        }
    }

    pub(crate) fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// Records a comment. The same comment may be matched more than once
    /// while the recognizer backtracks, so comments are keyed by offset.
    pub(crate) fn block_comment(&self, start: usize, end: usize, value: &str) {
        let text = self.comment_text(start, end, value);
        self.comments
            .borrow_mut()
            .entry(start)
            .or_insert(Comment::Block(text));
    }

    pub(crate) fn line_comment(&self, start: usize, end: usize, value: &str) {
        let text = self.comment_text(start, end, value);
        self.comments
            .borrow_mut()
            .entry(start)
            .or_insert(Comment::Line(text));
    }

    fn comment_text(&self, start: usize, end: usize, value: &str) -> CommentText {
        CommentText {
            value: value.to_owned(),
            span: self.span(start, end),
        }
    }

    /// Notes an import declaration so that later `library.rule` references
    /// can be numbered after the namespace import that introduced them.
    pub(crate) fn import(&self, what: &[ImportClause]) {
        let number = self.imports.get();
        self.imports.set(number + 1);
        let mut libraries = self.libraries.borrow_mut();
        for clause in what {
            if let ImportClause::All(namespace) = clause {
                libraries.push((namespace.binding.id.value.clone(), number));
            }
        }
    }

    pub(crate) fn library_number(&self, library: &str) -> Option<usize> {
        self.libraries
            .borrow()
            .iter()
            .find(|(name, _)| name == library)
            .map(|&(_, number)| number)
    }

    /// Enters one nesting level. Always paired with [`Self::ascend`], even
    /// when the level is rejected.
    pub(crate) fn descend(&self) -> Result<(), &'static str> {
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        if depth > MAX_NESTING_DEPTH {
            Err(NESTING_EXPECTATION)
        } else {
            Ok(())
        }
    }

    pub(crate) fn ascend(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    pub(crate) fn into_comments(self) -> Vec<Comment> {
        self.comments.into_inner().into_values().collect()
    }
}
