#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use docchat_client::{DocumentApi, UploadFile};
use docchat_core::{DocchatError, DocchatResult, DocumentId, DocumentSummary};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};

type Gate = oneshot::Receiver<Result<String, String>>;

/// In-process `DocumentApi` whose requests complete only when the test
/// opens the matching gate, so completion order is fully controlled.
#[derive(Default)]
pub struct GatedApi {
    asks: Mutex<HashMap<String, Gate>>,
    uploads: Mutex<Option<Gate>>,
}

impl GatedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a gate for `question`; send `Ok(answer)` or `Err(reason)`.
    pub fn gate(&self, question: &str) -> oneshot::Sender<Result<String, String>> {
        let (tx, rx) = oneshot::channel();
        self.asks.lock().insert(question.to_string(), rx);
        tx
    }

    pub fn gate_upload(&self) -> oneshot::Sender<Result<String, String>> {
        let (tx, rx) = oneshot::channel();
        *self.uploads.lock() = Some(rx);
        tx
    }
}

async fn wait(gate: Gate) -> DocchatResult<String> {
    match gate.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(reason)) => Err(DocchatError::Http(reason)),
        Err(_) => Err(DocchatError::Http("gate dropped".to_string())),
    }
}

#[async_trait]
impl DocumentApi for GatedApi {
    async fn upload(&self, _file: UploadFile) -> DocchatResult<DocumentId> {
        let gate = self.uploads.lock().take().expect("no upload gate registered");
        DocumentId::new(wait(gate).await?)
    }

    async fn ask(&self, _document_id: &DocumentId, query: &str) -> DocchatResult<String> {
        let gate = self
            .asks
            .lock()
            .remove(query)
            .unwrap_or_else(|| panic!("no gate registered for {query:?}"));
        wait(gate).await
    }

    async fn list_documents(&self) -> DocchatResult<Vec<DocumentSummary>> {
        Ok(Vec::new())
    }
}

pub async fn next_event<T: Clone>(rx: &mut broadcast::Receiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

pub fn doc_id(raw: &str) -> DocumentId {
    DocumentId::new(raw).unwrap()
}
