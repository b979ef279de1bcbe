//! Choosing between the interactive and the plain formatter.
//!
//! The choice follows a priority order:
//!
//! 1. An explicit [`FormatterMode`] passed to [`formatter_for`].
//! 2. The `TASK_TALLY_MODE` environment variable, read by [`default_formatter`].
//! 3. Terminal detection: interactive output when stdout is a terminal and
//!    `TERM` is not `dumb`, plain lines otherwise.

use std::str::FromStr;
use std::sync::Arc;

use is_terminal::IsTerminal;

use crate::{DIAGNOSTICS, Error, InteractiveFormatter, PlainFormatter, SharedFormatter};

/// Environment variable holding a [`FormatterMode`] name.
pub const MODE_ENV: &str = "TASK_TALLY_MODE";

/// Which formatter to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatterMode {
    /// Interactive on a capable terminal, plain otherwise.
    #[default]
    Auto,
    Interactive,
    Plain,
}

impl FormatterMode {
    /// Reads [`MODE_ENV`]. An unset or empty variable means [`FormatterMode::Auto`].
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var(MODE_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse(),
            _ => Ok(Self::Auto),
        }
    }

    /// Whether this mode renders interactively, given whether stdout is a
    /// capable terminal.
    pub fn is_interactive(self, capable_terminal: bool) -> bool {
        match self {
            Self::Auto => capable_terminal,
            Self::Interactive => true,
            Self::Plain => false,
        }
    }
}

impl FromStr for FormatterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "interactive" | "tty" => Ok(Self::Interactive),
            "plain" | "text" => Ok(Self::Plain),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for FormatterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Interactive => "interactive",
            Self::Plain => "plain",
        })
    }
}

/// Detect whether stdout can take cursor movement.
pub(crate) fn stdout_is_capable() -> bool {
    if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Builds the formatter for `mode`, writing to stdout.
pub fn formatter_for(mode: FormatterMode) -> SharedFormatter {
    if mode.is_interactive(stdout_is_capable()) {
        Arc::new(InteractiveFormatter::stdout())
    } else {
        Arc::new(PlainFormatter::stdout())
    }
}

/// Builds the formatter selected by the environment, writing to stdout.
///
/// An invalid [`MODE_ENV`] value is logged and treated as `auto`.
pub fn default_formatter() -> SharedFormatter {
    let mode = FormatterMode::from_env().unwrap_or_else(|error| {
        tracing::warn!(target: DIAGNOSTICS, %error, "ignoring {MODE_ENV}");
        FormatterMode::Auto
    });
    formatter_for(mode)
}
