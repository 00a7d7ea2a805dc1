use crate::file::UploadFile;
use async_trait::async_trait;
use docchat_core::{DocchatResult, DocumentId, DocumentSummary};

/// Trait for the document service backend.
///
/// The upload session and the conversation manager only talk to the service
/// through this trait, so tests can substitute an in-process implementation
/// that controls when each request completes.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Sends one file for ingestion and returns the identifier that scopes
    /// all later questions.
    async fn upload(&self, file: UploadFile) -> DocchatResult<DocumentId>;

    /// Asks one question about an ingested document and returns the answer text.
    async fn ask(&self, document_id: &DocumentId, query: &str) -> DocchatResult<String>;

    /// Lists documents the service currently holds.
    async fn list_documents(&self) -> DocchatResult<Vec<DocumentSummary>>;
}
