//! Error types.
//!
//! Two families live here. [`ServiceError`] is what the users service hands
//! back to the dispatcher; every variant is translated into a JSON error
//! response and never escapes the request. [`Error`] surfaces infrastructure
//! failures: loading configuration, binding to a port, accepting a connection.

use thiserror::Error as ThisError;

/// Message sent for every failure the dispatcher does not classify.
pub const UNEXPECTED_ERROR: &str = "Unexpected error occurred";

/// Message sent for unmatched routes and id-on-create.
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

/// A failed service operation, tagged by how the client should see it.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ServiceError {
    /// Malformed or semantically invalid input. Answered with 400.
    #[error("{0}")]
    Validation(String),

    /// The addressed resource does not exist. Answered with 404.
    #[error("{0}")]
    NotFound(String),

    /// The request method has no operation on the collection. Answered with
    /// 500 and the generic message.
    #[error("Unsupported operation")]
    Unsupported,

    /// Anything else. Answered with 500; the text is logged, never sent.
    #[error("{0}")]
    Other(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// The error type returned by userd's fallible infrastructure operations.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address `{0}`")]
    Addr(String),
}
