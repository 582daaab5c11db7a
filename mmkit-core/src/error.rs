//! Library construction and snapshot errors

use thiserror::Error;

/// Error type for library operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// IO error when reading or writing a snapshot
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed snapshot
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A symbol or label name was registered twice
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    /// A symbol name that was never registered
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    /// A token that does not belong to this library
    #[error("unknown token: {0}")]
    UnknownToken(String),
    /// A sentence or assertion breaks an elaboration invariant
    #[error("invalid {label}: {reason}")]
    Invariant {
        /// Name of the offending label
        label: String,
        /// What is wrong with it
        reason: String,
    },
}

impl LibraryError {
    pub(crate) fn invariant(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invariant {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for library operations
pub type LibraryResult<T> = Result<T, LibraryError>;
