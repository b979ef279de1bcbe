use thiserror::Error;

/// Errors produced while configuring task output.
///
/// Rendering itself never fails loudly: write errors are handed to the
/// formatter's error handler instead. See
/// [`InteractiveFormatter::with_error_handler`](crate::InteractiveFormatter::with_error_handler).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A formatter mode name that is not one of `auto`, `interactive` or `plain`.
    #[error("unknown formatter mode `{0}` (expected auto, interactive or plain)")]
    UnknownMode(String),
}
