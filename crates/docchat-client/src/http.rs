use crate::api::DocumentApi;
use crate::file::UploadFile;
use async_trait::async_trait;
use docchat_core::wire::error_detail;
use docchat_core::{
    AskRequest, AskResponse, ClientConfig, DocchatError, DocchatResult, DocumentId,
    DocumentSummary, UploadResponse,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// reqwest-backed [`DocumentApi`].
///
/// Endpoints are resolved against `api_base_url` from the [`ClientConfig`]
/// passed at construction.
pub struct HttpDocumentApi {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpDocumentApi {
    /// Validates `config` and builds the underlying reqwest client.
    pub fn new(config: ClientConfig) -> DocchatResult<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DocchatError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl DocumentApi for HttpDocumentApi {
    async fn upload(&self, file: UploadFile) -> DocchatResult<DocumentId> {
        let url = self.config.endpoint("upload");
        info!(url = %url, file_name = %file.file_name, size = file.len(), "Uploading document");

        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| DocchatError::Http(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DocchatError::Http(e.to_string()))?;

        let body: UploadResponse = decode(resp).await?;
        info!(document_id = %body.document_id, "Document ingested");
        Ok(body.document_id)
    }

    async fn ask(&self, document_id: &DocumentId, query: &str) -> DocchatResult<String> {
        let url = self.config.endpoint("ask");
        debug!(url = %url, document_id = %document_id, "Asking question");

        let resp = self
            .http
            .post(&url)
            .json(&AskRequest { document_id, query })
            .send()
            .await
            .map_err(|e| DocchatError::Http(e.to_string()))?;

        let body: AskResponse = decode(resp).await?;
        Ok(body.response)
    }

    async fn list_documents(&self) -> DocchatResult<Vec<DocumentSummary>> {
        let url = self.config.endpoint("documents");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DocchatError::Http(e.to_string()))?;
        decode(resp).await
    }
}

/// Any non-2xx status is a failure carrying the service's `detail` text.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> DocchatResult<T> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| DocchatError::Http(e.to_string()))?;

    if !status.is_success() {
        return Err(DocchatError::Api {
            status: status.as_u16(),
            body: error_detail(&text),
        });
    }

    Ok(serde_json::from_str(&text)?)
}
