use crate::DocumentId;
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /upload`.
///
/// The service also sends a human-readable `message`; only the id is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier of the ingested document.
    pub document_id: DocumentId,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    /// Document to query.
    pub document_id: &'a DocumentId,
    /// The question text.
    pub query: &'a str,
}

/// Body of a successful `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text.
    pub response: String,
    /// Echo of the question, when the service includes it.
    #[serde(default)]
    pub query: Option<String>,
    /// File name of the document that was queried, when included.
    #[serde(default)]
    pub document: Option<String>,
}

/// One entry of `GET /documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Identifier to open a conversation with.
    pub document_id: DocumentId,
    /// Original file name.
    pub file_name: String,
}

/// Extracts the `detail` field of an error body, falling back to the raw text.
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
