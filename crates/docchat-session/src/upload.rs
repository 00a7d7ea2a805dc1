use docchat_client::{DocumentApi, HttpDocumentApi, UploadFile};
use docchat_core::{ClientConfig, DocchatError, DocchatResult, Route};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Observable state of the upload view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// Showing the form.
    Idle,
    /// A request is in flight; the form is replaced by a progress indicator.
    Processing { file_name: String },
    /// The last attempt failed. The form is shown again with this reason.
    Failed { reason: String },
}

impl UploadState {
    /// True while a request is in flight.
    pub fn is_processing(&self) -> bool {
        matches!(self, UploadState::Processing { .. })
    }
}

/// Sends one document for ingestion and hands the resulting id to the
/// conversation view.
pub struct UploadSession {
    api: Arc<dyn DocumentApi>,
    state: watch::Sender<UploadState>,
}

impl UploadSession {
    /// Idle session over `api`.
    pub fn new(api: Arc<dyn DocumentApi>) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self { api, state }
    }

    /// Builds a session talking to the HTTP service described by `config`.
    pub fn connect(config: &ClientConfig) -> DocchatResult<Self> {
        Ok(Self::new(Arc::new(HttpDocumentApi::new(config.clone())?)))
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// True while an upload request is in flight.
    pub fn is_processing(&self) -> bool {
        self.state.borrow().is_processing()
    }

    /// Reason of the last failed attempt, cleared by the next attempt.
    pub fn last_error(&self) -> Option<String> {
        match &*self.state.borrow() {
            UploadState::Failed { reason } => Some(reason.clone()),
            _ => None,
        }
    }

    /// Uploads `file` and returns the conversation route for the new document.
    ///
    /// `Processing` holds exactly while the request is in flight, on the
    /// success path and the failure path alike. A second call while one is
    /// in flight is rejected with `Busy`.
    pub async fn submit(&self, file: UploadFile) -> DocchatResult<Route> {
        let file_name = file.file_name.clone();
        let guard = ProcessingGuard::acquire(&self.state, &file_name)?;

        match self.api.upload(file).await {
            Ok(document_id) => {
                drop(guard);
                info!(document_id = %document_id, file_name = %file_name, "Upload complete");
                Ok(Route::chat(document_id))
            }
            Err(e) => {
                error!(file_name = %file_name, error = %e, "Error uploading file");
                guard.fail(e.to_string());
                Err(e)
            }
        }
    }
}

/// Leaves `Processing` when dropped, whichever way `submit` exits.
struct ProcessingGuard<'a> {
    state: &'a watch::Sender<UploadState>,
    outcome: UploadState,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(state: &'a watch::Sender<UploadState>, file_name: &str) -> DocchatResult<Self> {
        let mut busy = false;
        state.send_if_modified(|current| {
            if current.is_processing() {
                busy = true;
                return false;
            }
            *current = UploadState::Processing {
                file_name: file_name.to_string(),
            };
            true
        });
        if busy {
            return Err(DocchatError::Busy);
        }
        Ok(Self {
            state,
            outcome: UploadState::Idle,
        })
    }

    fn fail(mut self, reason: String) {
        self.outcome = UploadState::Failed { reason };
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        let outcome = std::mem::replace(&mut self.outcome, UploadState::Idle);
        self.state.send_replace(outcome);
    }
}
