use crate::{DocchatError, DocchatResult, DocumentId};

/// A navigable client address.
///
/// The upload view hands its result to the conversation view by producing
/// a `Route::Chat` carrying the new document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Upload,
    /// `/chat/:documentId`
    Chat { document_id: DocumentId },
}

impl Route {
    /// Conversation route for `document_id`.
    pub fn chat(document_id: DocumentId) -> Self {
        Route::Chat { document_id }
    }

    /// Parses an address such as `/` or `/chat/abc123`. Every address is
    /// rooted; anything else is an `InvalidRoute`.
    pub fn parse(path: &str) -> DocchatResult<Self> {
        let invalid = || DocchatError::InvalidRoute(path.to_string());
        let trimmed = path.trim();
        if !trimmed.starts_with('/') {
            return Err(invalid());
        }
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Upload),
            ["chat", id] => Ok(Route::Chat {
                document_id: DocumentId::new(*id).map_err(|_| invalid())?,
            }),
            _ => Err(invalid()),
        }
    }

    /// Address string, the inverse of [`Route::parse`].
    pub fn path(&self) -> String {
        match self {
            Route::Upload => "/".to_string(),
            Route::Chat { document_id } => format!("/chat/{document_id}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = DocchatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
