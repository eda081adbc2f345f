use thiserror::Error;

use crate::models::RecordKind;

/// Failures raised while building or formatting citation records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CitationError {
    /// A record failed its construction-time constraints.
    #[error("invalid {kind} record: field '{field}' {reason}")]
    Validation {
        kind: RecordKind,
        field: &'static str,
        reason: String,
    },
    /// The style carries no template for the record kind.
    #[error("style '{style}' has no template for {kind} record \"{identifier}\"")]
    UnsupportedKind {
        kind: RecordKind,
        style: String,
        identifier: String,
    },
    /// A record in a list could not be dispatched to a template.
    #[error(
        "record #{position} ({kind} \"{identifier}\") cannot be formatted with style '{style}'"
    )]
    UnknownRecordKind {
        kind: RecordKind,
        style: String,
        position: usize,
        identifier: String,
    },
    /// A template placeholder does not resolve to a record field.
    #[error(
        "template placeholder '${field}' of style '{style}' does not resolve on {kind} record \"{identifier}\""
    )]
    MissingField {
        kind: RecordKind,
        style: String,
        field: String,
        identifier: String,
    },
    /// The requested citation style is not registered.
    #[error("unknown citation style '{0}'")]
    UnknownStyle(String),
}

impl CitationError {
    pub(crate) fn validation<S: Into<String>>(
        kind: RecordKind,
        field: &'static str,
        reason: S,
    ) -> Self {
        CitationError::Validation {
            kind,
            field,
            reason: reason.into(),
        }
    }
}
