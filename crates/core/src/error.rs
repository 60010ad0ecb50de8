//! Error types for the sphere engine
//!
//! Every fallible operation in the workspace returns [`Result`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! There is no "not found" variant and no consistency-violation variant.
//! Unknown ids are answered with empty results, and orphaned postings are
//! skipped and logged at read time.

use std::io;
use thiserror::Error;

/// Result type alias for sphere operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the sphere engine
#[derive(Debug, Error)]
pub enum Error {
    /// A query or filter was malformed (rejected before candidate retrieval)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document cannot be indexed as supplied
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A document type name did not match any known type
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (config file operations)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Shorthand for a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Whether this error was caused by caller input rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::InvalidDocument(_) | Error::UnknownDocumentType(_)
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
