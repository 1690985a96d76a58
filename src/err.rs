use crate::event::EventKind;
use crate::name::ElementName;
use crate::value::TargetType;

use thiserror::Error;

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Errors raised while decoding a BXML event stream.
///
/// None of these are recovered from locally; the element-walking driver is expected to abort
/// the current document and surface the error to its caller.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Offset {position}: expected a {expected} event, found {found}")]
    UnexpectedEvent {
        expected: EventKind,
        found: EventKind,
        position: u64,
    },

    #[error("Offset {position}: expected {kind} for `{expected}`, found `{found}`")]
    ElementMismatch {
        kind: EventKind,
        expected: String,
        found: ElementName,
        position: u64,
    },

    #[error("Offset {position}: `{decoder}` cannot decode a {kind} event")]
    UnsupportedValueKind {
        decoder: &'static str,
        kind: EventKind,
        position: u64,
    },

    #[error("Offset {position}: {kind} event has no {accessor} value at index {index}")]
    ValueAccess {
        accessor: &'static str,
        kind: EventKind,
        index: usize,
        position: u64,
    },

    #[error("Offset {position}: {kind} event carries no element name")]
    NoElementName { kind: EventKind, position: u64 },

    #[error("Offset {position}: failed to parse `{text}` as a {element} array item")]
    InvalidArrayItem {
        text: String,
        element: TargetType,
        position: u64,
    },

    #[error("Offset {position}: failed to parse date `{text}`, caused by: {source}")]
    DateParse {
        text: String,
        position: u64,
        #[source]
        source: jiff::Error,
    },

    #[error("Offset {position}: no decoder registered for element `{name}`")]
    NoMatchingDecoder { name: ElementName, position: u64 },

    #[error("Reached the end of the event stream at offset {position}")]
    UnexpectedEndOfStream { position: u64 },

    #[error("Invalid decoder configuration: {message}")]
    Configuration { message: String },
}

impl DecodeError {
    /// Cursor position at which the error was detected, if it is tied to one.
    pub fn position(&self) -> Option<u64> {
        match self {
            DecodeError::UnexpectedEvent { position, .. }
            | DecodeError::ElementMismatch { position, .. }
            | DecodeError::UnsupportedValueKind { position, .. }
            | DecodeError::ValueAccess { position, .. }
            | DecodeError::NoElementName { position, .. }
            | DecodeError::InvalidArrayItem { position, .. }
            | DecodeError::DateParse { position, .. }
            | DecodeError::NoMatchingDecoder { position, .. }
            | DecodeError::UnexpectedEndOfStream { position } => Some(*position),
            DecodeError::Configuration { .. } => None,
        }
    }

    /// True for the errors raised by a failed `require` checkpoint.
    pub fn is_structural_mismatch(&self) -> bool {
        matches!(
            self,
            DecodeError::UnexpectedEvent { .. } | DecodeError::ElementMismatch { .. }
        )
    }
}
