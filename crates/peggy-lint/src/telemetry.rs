//! Structured telemetry initialisation for lint hosts.
//!
//! The configured filter is scoped to the parser and lint targets: a bare
//! level such as `debug` enables those two targets only, while every other
//! target stays at `warn`. Directives naming a target pass through as
//! written.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use peggy_parser::PARSER_TARGET;
use tracing::level_filters::LevelFilter;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::LintConfig;
use crate::host::LINT_TARGET;
use crate::logging::LogFormat;

const OTHER_TARGETS: &str = "warn";

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Repeated calls are idempotent: the first successful invocation installs
/// the global subscriber and later invocations return a fresh
/// [`TelemetryHandle`] without touching the global state again.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter does not
/// parse, or [`TelemetryError::Subscriber`] when another subscriber was
/// installed outside this function.
///
/// # Examples
///
/// ```rust
/// use peggy_lint::{LintConfig, telemetry};
///
/// # fn main() -> Result<(), peggy_lint::telemetry::TelemetryError> {
/// let config = LintConfig::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop(first);
/// drop(second);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &LintConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Expands a configured filter into directives scoped to the lint targets.
///
/// # Example
///
/// ```
/// use peggy_lint::telemetry::scoped_directives;
///
/// assert_eq!(
///     scoped_directives("debug,hyper=trace"),
///     "warn,peggy_parser=debug,peggy_lint=debug,hyper=trace"
/// );
/// ```
#[must_use]
pub fn scoped_directives(filter: &str) -> String {
    let mut directives = vec![OTHER_TARGETS.to_owned()];
    for directive in filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        if directive.parse::<LevelFilter>().is_ok() {
            directives.push(format!("{PARSER_TARGET}={directive}"));
            directives.push(format!("{LINT_TARGET}={directive}"));
        } else {
            directives.push(directive.to_owned());
        }
    }
    directives.join(",")
}

pub(crate) fn env_filter(config: &LintConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(scoped_directives(config.log_filter()))
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &LintConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(io::stderr)
            // Keep colour on terminals only; editors capture stderr.
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
