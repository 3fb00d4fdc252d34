//! Host-facing syntax errors with rendered source excerpts.

use peggy_parser::SyntaxError;
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// A grammar that the host could not parse.
///
/// Exposes the one-based start line and column of the failure and keeps
/// the recognizer's structured error as its [`source`](std::error::Error::source).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HostParseError {
    message: String,
    line: u32,
    column: u32,
    #[source]
    syntax: Box<SyntaxError>,
}

impl HostParseError {
    /// Wraps `syntax`, rendering an excerpt of `text` into the message when
    /// the error carries a source identifier.
    ///
    /// `context_lines` lines of source are shown above the failing line.
    #[must_use]
    pub fn new(syntax: SyntaxError, text: &str, context_lines: u32) -> Self {
        let message = match syntax.location().source() {
            Some(source) => format!(
                "{}\n{}",
                syntax.message(),
                render_excerpt(&syntax, source, text, context_lines)
            ),
            None => syntax.message().to_owned(),
        };
        let start = syntax.location().start();
        Self {
            message,
            line: start.line,
            column: start.column,
            syntax: Box::new(syntax),
        }
    }

    /// Returns the full message, including any excerpt.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the one-based line where the failure starts.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the one-based column where the failure starts.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the recognizer's structured error.
    #[must_use]
    pub fn syntax(&self) -> &SyntaxError {
        &self.syntax
    }
}

/// Renders the `File:` header, gutter, source lines and caret line.
fn render_excerpt(syntax: &SyntaxError, source: &str, text: &str, context_lines: u32) -> String {
    let start = syntax.location().start();
    let end = syntax.location().end();
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let first_line = start.line.saturating_sub(context_lines).max(1);
    let width = start.line.to_string().len();
    let mut output = String::new();
    output.push_str(&format!(
        "File: \"{source}\", line {}, column {}\n",
        start.line, start.column
    ));
    output.push_str(&format!("{:>width$} |", ""));

    for number in first_line..=start.line {
        let line = line_text(&lines, number);
        output.push_str(&format!("\n{number:>width$} | {line}"));
    }

    let line = line_text(&lines, start.line);
    let last_column = if end.line == start.line {
        end.column
    } else {
        column_count(line) + 1
    };
    let (padding, hats) = caret_parts(line, start.column, last_column);
    output.push_str(&format!("\n{:>width$} | {padding}{hats}", ""));
    output
}

fn line_text<'t>(lines: &[&'t str], number: u32) -> &'t str {
    usize::try_from(number)
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| lines.get(index))
        .copied()
        .unwrap_or_default()
}

fn column_count(line: &str) -> u32 {
    u32::try_from(line.chars().count()).unwrap_or(u32::MAX)
}

/// Builds the whitespace before the caret and the caret run itself.
///
/// Tabs in the prefix are copied so the caret lines up in any tab width;
/// wide characters count for their display width.
fn caret_parts(line: &str, start_column: u32, last_column: u32) -> (String, String) {
    let mut padding = String::new();
    let mut hats = 0_usize;
    for (column, ch) in (1_u32..).zip(line.chars()) {
        if column >= last_column {
            break;
        }
        let width = ch.width().unwrap_or(0).max(1);
        if column < start_column {
            if ch == '\t' {
                padding.push('\t');
            } else {
                padding.extend(std::iter::repeat_n(' ', width));
            }
        } else {
            hats += width;
        }
    }
    let missing = start_column.saturating_sub(column_count(line) + 1);
    padding.extend(std::iter::repeat_n(' ', usize::try_from(missing).unwrap_or(0)));
    (padding, "^".repeat(hats.max(1)))
}
