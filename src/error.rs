//! Error types for the pdfcheck library.

use std::io;
use thiserror::Error;

/// Result type alias for pdfcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing a decoded document tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the document tree from disk.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The external decoder's output could not be read as a document tree.
    ///
    /// Fatal: a decode failure aborts the whole run.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A validation token did not match any field id or label.
    #[error("Field [{token}] not found")]
    FieldNotFound {
        /// The token that was looked up.
        token: String,
    },

    /// A `TextBlock` assertion did not match any text fragment.
    #[error("TextBlock [{expected}] not found")]
    TextBlockNotFound {
        /// The expected text that was searched for.
        expected: String,
    },

    /// An expected value did not match the resolved field or text.
    ///
    /// Carries both payloads (serialized) for diagnostics.
    #[error("Validation failed for [{token}]: expected {expected}, actual {actual}")]
    Validation {
        /// The validation token.
        token: String,
        /// The expected value, serialized.
        expected: String,
        /// The actual value that was found, serialized.
        actual: String,
    },

    /// Error serializing report output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
