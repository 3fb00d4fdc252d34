//! Log output formats.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Supported logging output formats.
///
/// Names are matched case-insensitively, both when parsed from text and
/// when read from a configuration document.
///
/// # Example
///
/// ```
/// use peggy_lint::LogFormat;
///
/// assert_eq!("COMPACT".parse::<LogFormat>().ok(), Some(LogFormat::Compact));
/// assert_eq!(LogFormat::default().to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| serde::de::Error::unknown_variant(&name, &["json", "compact"]))
    }
}
