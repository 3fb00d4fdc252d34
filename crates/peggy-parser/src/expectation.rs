//! Expected-token descriptions and Peggy-style error messages.

use peggy_ast::ClassPart;
use serde::Serialize;

/// Something the recognizer would have accepted at the failure position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// A literal string.
    Literal {
        /// The literal text, unescaped.
        text: String,
        /// Whether the literal matches case-insensitively.
        ignore_case: bool,
    },
    /// A character class.
    ///
    /// The recognizer gives each of its own classes a name, so errors from
    /// [`parse`](crate::parse) report them as [`Expectation::Other`], for
    /// example `hexadecimal digit`. This variant renders classes in errors
    /// built with [`SyntaxError::new`](crate::SyntaxError::new).
    Class {
        /// Characters and ranges of the class.
        parts: Vec<ClassPart>,
        /// Whether the class is negated.
        inverted: bool,
        /// Whether the class matches case-insensitively.
        ignore_case: bool,
    },
    /// Any single character.
    Any,
    /// The end of the input.
    End,
    /// A named construct such as `identifier`.
    Other {
        /// Human-readable description.
        description: String,
    },
}

impl Expectation {
    /// Renders the expectation the way it appears in error messages.
    ///
    /// # Example
    ///
    /// ```
    /// use peggy_parser::Expectation;
    ///
    /// let quote = Expectation::Literal { text: "\"".to_owned(), ignore_case: false };
    /// assert_eq!(quote.describe(), r#""\"""#);
    /// assert_eq!(Expectation::Any.describe(), "any character");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Literal { text, .. } => format!("\"{}\"", literal_escape(text)),
            Self::Class {
                parts,
                inverted,
                ignore_case,
            } => {
                let mut rendered = String::from("[");
                if *inverted {
                    rendered.push('^');
                }
                for part in parts {
                    match part {
                        ClassPart::Char(ch) => rendered.push_str(&class_escape(&ch.to_string())),
                        ClassPart::Range(low, high) => {
                            rendered.push_str(&class_escape(&low.to_string()));
                            rendered.push('-');
                            rendered.push_str(&class_escape(&high.to_string()));
                        }
                    }
                }
                rendered.push(']');
                if *ignore_case {
                    rendered.push('i');
                }
                rendered
            }
            Self::Any => "any character".to_owned(),
            Self::End => "end of input".to_owned(),
            Self::Other { description } => description.clone(),
        }
    }

    /// Builds `Expected … but … found.` from the expectation set and the
    /// character found at the failure position.
    ///
    /// Descriptions are sorted and de-duplicated before joining.
    ///
    /// # Example
    ///
    /// ```
    /// use peggy_parser::Expectation;
    ///
    /// let expected = [Expectation::Any, Expectation::End, Expectation::Any];
    /// let message = Expectation::message(&expected, Some(']'));
    /// assert_eq!(message, r#"Expected any character or end of input but "]" found."#);
    /// ```
    #[must_use]
    pub fn message(expected: &[Self], found: Option<char>) -> String {
        let mut descriptions: Vec<String> = expected.iter().map(Self::describe).collect();
        descriptions.sort();
        descriptions.dedup();

        let expected_text = match descriptions.as_slice() {
            [] => "valid input".to_owned(),
            [only] => only.clone(),
            [first, second] => format!("{first} or {second}"),
            [init @ .., last] => format!("{}, or {last}", init.join(", ")),
        };
        let found_text = found.map_or_else(
            || "end of input".to_owned(),
            |ch| format!("\"{}\"", literal_escape(&ch.to_string())),
        );
        format!("Expected {expected_text} but {found_text} found.")
    }

    /// Maps one of `peg`'s expected-token strings onto an expectation.
    pub(crate) fn from_peg_token(token: &str) -> Self {
        if token == "EOF" {
            return Self::End;
        }
        if token.chars().filter(|ch| !ch.is_whitespace()).eq("[_]".chars()) {
            return Self::Any;
        }
        match unquote(token) {
            Some(text) => Self::Literal {
                text,
                ignore_case: false,
            },
            None => Self::Other {
                description: token.to_owned(),
            },
        }
    }
}

/// Escapes `text` for display inside a double-quoted literal.
///
/// # Example
///
/// ```
/// use peggy_parser::literal_escape;
///
/// assert_eq!(literal_escape("a\"b\\\n\u{1}"), "a\\\"b\\\\\\n\\x01");
/// ```
#[must_use]
pub fn literal_escape(text: &str) -> String {
    escape_with(text, &[])
}

/// Escapes `text` for display inside a character class.
///
/// Escapes everything [`literal_escape`] does, plus `]`, `^` and `-`.
#[must_use]
pub fn class_escape(text: &str) -> String {
    escape_with(text, &[']', '^', '-'])
}

fn escape_with(text: &str, extra: &[char]) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = u32::from(ch);
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\0' => escaped.push_str("\\0"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ if extra.contains(&ch) => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ if code < 0x20 || (0x7F..=0x9F).contains(&code) => {
                escaped.push_str(&format!("\\x{code:02X}"));
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Strips the quotes `peg` puts around literal tokens and undoes the
/// Rust debug escaping inside them.
fn unquote(token: &str) -> Option<String> {
    let inner = token.strip_prefix('"')?.strip_suffix('"')?;
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some('0') => text.push('\0'),
            Some('u') => {
                let digits: String = chars
                    .by_ref()
                    .skip_while(|&digit| digit == '{')
                    .take_while(|&digit| digit != '}')
                    .collect();
                text.extend(
                    u32::from_str_radix(&digits, 16)
                        .ok()
                        .and_then(char::from_u32),
                );
            }
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    Some(text)
}
