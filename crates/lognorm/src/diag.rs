//! Structured, non-fatal diagnostics collected while processing one event.
//!
//! Nothing in the per-record path returns an error: a failed conversion, an
//! unparseable date or an unmapped field is recorded here, logged through
//! `tracing`, and processing continues.

use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Keyed dispatch found no grammar for the message id.
    DispatchMiss,
    /// A typed converter rejected a value.
    ConversionFailure,
    /// No candidate format program parsed the joined date string.
    DateParseFailure,
    /// No candidate duration format found enough numbers.
    DurationFailure,
    /// A field named as a date/duration argument was not set.
    MissingArgument,
    /// CALC got the wrong arity, a non-numeric operand or an unknown operator.
    CalcError,
    /// Any other function call that produced no value.
    FunctionError,
    /// A raw capture has no mapping entry.
    UnmappedField,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::DispatchMiss => "dispatch_miss",
            DiagnosticKind::ConversionFailure => "conversion_failure",
            DiagnosticKind::DateParseFailure => "date_parse_failure",
            DiagnosticKind::DurationFailure => "duration_failure",
            DiagnosticKind::MissingArgument => "missing_argument",
            DiagnosticKind::CalcError => "calc_error",
            DiagnosticKind::FunctionError => "function_error",
            DiagnosticKind::UnmappedField => "unmapped_field",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Field, node id or function the diagnostic is about.
    pub subject: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a log record.
    pub fn record(&mut self, kind: DiagnosticKind, subject: impl Into<String>, detail: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            subject: subject.into(),
            detail: detail.into(),
        };

        match kind {
            DiagnosticKind::DispatchMiss | DiagnosticKind::UnmappedField | DiagnosticKind::MissingArgument => {
                debug!(kind = kind.as_str(), subject = %diagnostic.subject, "{}", diagnostic.detail);
            }
            _ => {
                warn!(kind = kind.as_str(), subject = %diagnostic.subject, "{}", diagnostic.detail);
            }
        }

        self.records.push(diagnostic);
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count_by_kind() {
        let mut diags = Diagnostics::new();
        diags.record(DiagnosticKind::UnmappedField, "fld1", "no mapping entry");
        diags.record(DiagnosticKind::UnmappedField, "fld2", "no mapping entry");
        diags.record(DiagnosticKind::CalcError, "CALC", "non-numeric operand");

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.count(DiagnosticKind::UnmappedField), 2);
        assert_eq!(diags.count(DiagnosticKind::CalcError), 1);
        assert_eq!(diags.count(DiagnosticKind::DispatchMiss), 0);
    }

    #[test]
    fn test_serializes_kind_as_snake_case() {
        let mut diags = Diagnostics::new();
        diags.record(DiagnosticKind::DateParseFailure, "event_time", "no format matched");
        let json = serde_json::to_string(&diags).unwrap();
        assert!(json.contains(r#""kind":"date_parse_failure""#), "got: {}", json);
    }
}
