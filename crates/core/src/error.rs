//! Error types for s3i-core
//!
//! One error type covers the three failure classes an operation can hit:
//! local validation, backend (service) errors and local I/O.

use thiserror::Error;

use crate::acl::CannedAcl;

/// Result type alias for s3i-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3i-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operator input rejected before any backend call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// ACL value outside the canned set
    #[error(
        "Invalid ACL value '{0}'. Please use one of the following: {names}",
        names = CannedAcl::names().join(", ")
    )]
    InvalidAcl(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error returned by the storage service, with its machine-readable code
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// Transport failure without a service error code
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Build a service error from a code and message
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The backend error code, if this error came from the storage service
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Service { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }
}
