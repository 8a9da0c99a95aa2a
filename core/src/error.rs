//! Error types for the catalog repository.
//!
//! # Design
//! Each layer owns its error: the mapper reports broken construction rules,
//! the codec reports undecodable bodies, the transport reports network
//! failures. `RepositoryError` is what callers of `HttpRepository` see.
//! "Not found" is not an error here: single-entity reads return `Ok(None)`.

use thiserror::Error;

use crate::http::HttpMethod;
use crate::registry::EntityKind;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A DTO could not be turned into a valid entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {reason}")]
pub struct MappingError {
    pub kind: EntityKind,
    pub reason: String,
}

impl MappingError {
    pub fn new(kind: EntityKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// A response body could not be decoded into entities.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("envelope property `{key}` is null")]
    NullCollection { key: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// The network round trip itself failed (no HTTP status available).
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors returned by `HttpRepository` operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No route or envelope pair is configured for the entity kind.
    #[error("unsupported entity kind `{kind}`: no {missing} registered")]
    UnsupportedType {
        kind: EntityKind,
        missing: &'static str,
    },

    /// The full collection could not be fetched or decoded.
    #[error("failed to retrieve {route}: {reason}")]
    RetrievalFailed { route: String, reason: String },

    /// A create, update or delete returned a non-success status.
    #[error("{method} {route} failed with HTTP {status}: {body}")]
    RemoteWriteFailed {
        method: HttpMethod,
        route: String,
        status: u16,
        body: String,
    },

    /// A single-result query matched more than one entity.
    #[error("expected at most one result, found {count}")]
    MultipleResultsUnexpected { count: usize },

    /// The entity could not be serialized for a write.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("operation cancelled")]
    Cancelled,
}

impl RepositoryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
