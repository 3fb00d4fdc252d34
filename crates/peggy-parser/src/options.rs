//! Options accepted by the recognizer.

/// Options controlling a single parse.
///
/// # Example
///
/// ```
/// use peggy_parser::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_source_id("grammar.peggy")
///     .with_reserved_words(["class", "let"]);
/// assert_eq!(options.source_id(), Some("grammar.peggy"));
/// assert_eq!(options.reserved_words(), ["class", "let"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    source_id: Option<String>,
    reserved_words: Vec<String>,
}

impl ParseOptions {
    /// Creates options with no source identifier and no reserved words.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source_id: None,
            reserved_words: Vec::new(),
        }
    }

    /// Sets the identifier reported in error locations.
    #[must_use]
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Sets the words that may not be used as labels.
    #[must_use]
    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the source identifier, if any.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// Returns the reserved label words.
    #[must_use]
    pub fn reserved_words(&self) -> &[String] {
        &self.reserved_words
    }
}
