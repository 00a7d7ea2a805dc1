//! Core types and error definitions for the docchat client.
//!
//! This crate provides the foundational types shared across all docchat crates,
//! including error handling, client configuration, the wire format of the
//! document service, the turn model, and the client address space.
//!
//! # Main types
//!
//! - [`DocchatError`]: Unified error enum for all docchat subsystems.
//! - [`DocchatResult`]: Convenience alias for `Result<T, DocchatError>`.
//! - [`DocumentId`]: Opaque session identifier returned by the ingestion endpoint.
//! - [`ClientConfig`]: Explicit configuration passed into every component.
//! - [`Turn`] / [`TurnStatus`]: One question and its (possibly pending) answer.
//! - [`Route`]: Navigable client addresses (`/`, `/chat/:documentId`).

/// Client configuration and its TOML loading.
pub mod config;
/// Navigable client addresses.
pub mod route;
/// Question/answer turns and their lifecycle.
pub mod turn;
/// Request and response bodies of the document service.
pub mod wire;

pub use config::{ClientConfig, SubmitPolicy};
pub use route::Route;
pub use turn::{Turn, TurnId, TurnStatus};
pub use wire::{AskRequest, AskResponse, DocumentSummary, UploadResponse};

use serde::{Deserialize, Serialize};

// --- Error types ---

/// Top-level error type for the docchat client.
///
/// Each variant corresponds to a failure class surfaced by one of the
/// components.
#[derive(Debug, thiserror::Error)]
pub enum DocchatError {
    /// A transport-level failure (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The document service answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or the `detail` field when the service sent one.
        body: String,
    },

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// A client address that matches no known view.
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// A question submitted with no text.
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// A document identifier with no text.
    #[error("Document id must not be empty")]
    EmptyDocumentId,

    /// Another request is already in flight and the policy forbids overlap.
    #[error("A request is already in flight")]
    Busy,

    /// The conversation was closed; no further writes are accepted.
    #[error("Conversation has been closed")]
    Disposed,

    /// No turn with this id exists in the transcript.
    #[error("Unknown turn: {0}")]
    UnknownTurn(TurnId),

    /// The turn was already answered or failed.
    #[error("Turn {0} is already resolved")]
    TurnAlreadyResolved(TurnId),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`DocchatError`].
pub type DocchatResult<T> = Result<T, DocchatError>;

impl DocchatError {
    /// Whether this error came from talking to the document service
    /// (transport or non-success status) rather than from local validation.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. } | Self::Json(_))
    }
}

// --- Session identifier ---

/// Opaque identifier of an uploaded document.
///
/// Produced by the ingestion endpoint and scoped to one conversation.
/// It is never interpreted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps a raw identifier, rejecting empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> DocchatResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DocchatError::EmptyDocumentId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as sent over the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = DocchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DocchatError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
