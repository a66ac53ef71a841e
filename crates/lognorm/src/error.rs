use thiserror::Error;

/// Errors raised while building a rule tree.
///
/// These are the only fatal errors in the crate: they surface before any
/// event is processed. Per-record problems are reported as
/// [`Diagnostic`](crate::diag::Diagnostic) records instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Empty dissect pattern")]
    EmptyPattern,

    #[error("Unterminated capture starting at offset {0}")]
    UnterminatedCapture(usize),

    #[error("Captures '{0}' and '{1}' are adjacent (a literal must separate them)")]
    AdjacentCaptures(String, String),

    #[error("Empty date/time format")]
    EmptyFormat,

    #[error("Unsupported date/time directive %{0}")]
    UnknownDirective(char),

    #[error("Format '{0}' ends with a dangling '%'")]
    DanglingPercent(String),

    #[error("No formats given for '{0}'")]
    NoFormats(String),

    #[error("Invalid network '{0}'")]
    InvalidNetwork(String),

    #[error("Invalid timezone offset '{0}' (expected ±HH:MM)")]
    InvalidTzOffset(String),
}
