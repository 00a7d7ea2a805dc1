use crate::{DocchatError, DocchatResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a turn, unique within one transcript.
///
/// Assigned in increasing order at insert time, so it also reflects
/// submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a turn is in its request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TurnStatus {
    /// The question was sent and no answer has arrived yet.
    Pending,
    /// The service answered.
    Answered {
        /// Answer text as returned by the service.
        text: String,
    },
    /// The request failed; the reason is shown in place of an answer.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl TurnStatus {
    /// True until the turn resolves.
    pub fn is_pending(&self) -> bool {
        matches!(self, TurnStatus::Pending)
    }
}

/// One question and its (possibly pending) answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Identifier assigned at insert time.
    pub id: TurnId,
    question: String,
    /// Lifecycle state, including the answer once it arrives.
    pub status: TurnStatus,
    /// When the question was inserted.
    pub asked_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Turn {
    /// Creates a pending turn. The question must contain non-whitespace text.
    pub fn new(id: TurnId, question: impl Into<String>) -> DocchatResult<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(DocchatError::EmptyQuestion);
        }
        Ok(Self {
            id,
            question,
            status: TurnStatus::Pending,
            asked_at: Utc::now(),
            resolved_at: None,
        })
    }

    /// The question as submitted.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The answer text, or `""` while pending or after a failure.
    pub fn response(&self) -> &str {
        match &self.status {
            TurnStatus::Answered { text } => text,
            TurnStatus::Pending | TurnStatus::Failed { .. } => "",
        }
    }

    /// True until an answer or failure is recorded.
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Moves the turn out of `Pending`. A turn resolves at most once;
    /// a second resolution is rejected and leaves the turn unchanged.
    pub fn resolve(&mut self, outcome: TurnStatus) -> DocchatResult<()> {
        if !self.is_pending() {
            return Err(DocchatError::TurnAlreadyResolved(self.id));
        }
        if outcome.is_pending() {
            return Ok(());
        }
        self.status = outcome;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }
}
