//! Error types for format operations and conversions

use std::fmt;
use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The input holds no recognisable process block
    #[error("No processes found")]
    NoProcess,
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Why a single document could not be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Nothing process-shaped in the input.
    Structural,
    /// Any other fault raised while extracting or rendering.
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Structural => f.write_str("structural failure"),
            FailureKind::Unexpected => f.write_str("unexpected failure"),
        }
    }
}

/// A reported, non-fatal failure to convert one labelled document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label}: {reason}")]
pub struct ConversionFailure {
    pub label: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl ConversionFailure {
    pub fn new(label: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            reason: reason.into(),
        }
    }

    /// Classifies a format error raised for `label`.
    pub fn from_format_error(label: impl Into<String>, err: FormatError) -> Self {
        let kind = match err {
            FormatError::NoProcess => FailureKind::Structural,
            _ => FailureKind::Unexpected,
        };
        Self::new(label, kind, err.to_string())
    }
}
