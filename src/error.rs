//! Error handling module for xml2cli
//!
//! Provides centralized error handling with proper error types using thiserror.
//! The script serializer itself is infallible; these errors come from the
//! layers around it (construction, markup reading, files). Config-file and
//! command-line failures are reported through `anyhow` instead.

use thiserror::Error;

/// Main error type for xml2cli
#[derive(Error, Debug)]
pub enum XmlToCliError {
    /// A required setting was not supplied before `build()`
    #[error("No {0} set")]
    MissingSetting(&'static str),

    /// The subsystem markup could not be turned into operations
    #[error("The XML does not appear to be valid: {0}")]
    InvalidConfiguration(String),

    /// IO errors (reading markup, writing scripts)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for xml2cli operations
pub type Result<T> = std::result::Result<T, XmlToCliError>;

// Convenient error constructors
impl XmlToCliError {
    /// Create an invalid configuration error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl From<roxmltree::Error> for XmlToCliError {
    fn from(err: roxmltree::Error) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}
