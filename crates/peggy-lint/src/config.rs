//! Configuration for the lint host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading a [`LintConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document was not valid JSON or did not match the schema.
    #[error("invalid lint configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for parsing, diagnostics and logging.
///
/// Every field has a default, so an empty document is a valid
/// configuration.
///
/// # Defaults
///
/// - `log_filter`: `info`
/// - `log_format`: `json`
/// - `context_lines`: 0
/// - `extra_reserved_words`: none
///
/// # Example
///
/// ```
/// use peggy_lint::{LintConfig, LogFormat};
///
/// let config = LintConfig::from_json_str(r#"{ "log_format": "Compact", "context_lines": 2 }"#)
///     .expect("valid configuration");
/// assert_eq!(config.log_format(), LogFormat::Compact);
/// assert_eq!(config.context_lines(), 2);
/// assert_eq!(config.log_filter(), "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    log_filter: String,
    log_format: LogFormat,
    context_lines: u32,
    extra_reserved_words: Vec<String>,
}

impl LintConfig {
    /// Reads a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the document is malformed, names an
    /// unknown field or holds a value of the wrong type.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Replaces the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Replaces the log output format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Sets how many source lines precede the failing line in excerpts.
    #[must_use]
    pub const fn with_context_lines(mut self, lines: u32) -> Self {
        self.context_lines = lines;
        self
    }

    /// Adds words that may not be used as labels.
    #[must_use]
    pub fn with_extra_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_reserved_words
            .extend(words.into_iter().map(Into::into));
        self
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the number of context lines shown before a failing line.
    #[must_use]
    pub const fn context_lines(&self) -> u32 {
        self.context_lines
    }

    /// Returns the reserved words added on top of the built-in list.
    #[must_use]
    pub fn extra_reserved_words(&self) -> &[String] {
        &self.extra_reserved_words
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
            context_lines: 0,
            extra_reserved_words: Vec::new(),
        }
    }
}
