//! Pulse decoding error types

use thiserror::Error;

/// Errors raised while normalizing or translating a pulse capture
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PulseError {
    /// Raw capture record does not have the expected header/sequence shape
    #[error("malformed capture: {0}")]
    MalformedCapture(#[from] CaptureDefect),

    /// A pulse code has no entry in the code table
    #[error("unknown pulse code {code:?} at position {position}")]
    UnknownCode { code: String, position: usize },
}

/// What exactly is wrong with a malformed capture record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureDefect {
    #[error("expected {expected} header fields, found {found}")]
    HeaderTooShort { expected: usize, found: usize },

    #[error("header field {index} is not a pulse length: {field:?}")]
    InvalidHeaderField { index: usize, field: String },

    #[error("{found} distinct pulse lengths cannot be addressed by single-digit ordinals")]
    TooManyLengths { found: usize },

    #[error("missing pulse sequence after header")]
    MissingSequence,

    #[error("unexpected data after pulse sequence at offset {offset}")]
    TrailingData { offset: usize },

    #[error("invalid byte 0x{byte:02x} at offset {offset} in pulse sequence")]
    InvalidByte { byte: u8, offset: usize },

    #[error("ordinal {ordinal} at offset {offset} exceeds the {available} pulse lengths in the header")]
    OrdinalOutOfRange {
        ordinal: u8,
        offset: usize,
        available: usize,
    },
}
