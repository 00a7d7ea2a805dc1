use crate::transcript::Transcript;
use crate::view::{ScrollPosition, TranscriptView};
use docchat_client::{DocumentApi, HttpDocumentApi};
use docchat_core::{
    ClientConfig, DocchatError, DocchatResult, DocumentId, SubmitPolicy, Turn, TurnId, TurnStatus,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const EVENT_CAPACITY: usize = 256;

/// Failure reason recorded for a turn whose `submit` future was dropped.
pub const CANCELLED_REASON: &str = "cancelled";

/// Change notifications published after every transcript mutation.
///
/// A front end redraws from [`ConversationManager::render`] when it
/// receives one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A question was inserted, before its request was sent.
    TurnAdded { turn_id: TurnId, question: String },
    /// The answer for this turn arrived.
    TurnAnswered { turn_id: TurnId },
    /// The request for this turn failed.
    TurnFailed { turn_id: TurnId, reason: String },
    /// The conversation was closed; no further events follow.
    Closed,
}

struct ConversationState {
    transcript: Transcript,
    draft: String,
    view: TranscriptView,
    closed: bool,
}

/// Owns the transcript of one document conversation.
///
/// Every question is inserted as a pending turn before its request is sent.
/// The completion handler captures the turn's id and resolves exactly that
/// turn, so answers arriving out of order never land on the wrong question.
/// Clones share state.
#[derive(Clone)]
pub struct ConversationManager {
    api: Arc<dyn DocumentApi>,
    document_id: DocumentId,
    policy: SubmitPolicy,
    state: Arc<Mutex<ConversationState>>,
    events: broadcast::Sender<ConversationEvent>,
}

impl ConversationManager {
    /// Opens an empty conversation about `document_id`.
    pub fn new(api: Arc<dyn DocumentApi>, document_id: DocumentId, config: &ClientConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        info!(document_id = %document_id, "Conversation opened");
        Self {
            api,
            document_id,
            policy: config.submit_policy,
            state: Arc::new(Mutex::new(ConversationState {
                transcript: Transcript::new(),
                draft: String::new(),
                view: TranscriptView::new(config.viewport_height),
                closed: false,
            })),
            events,
        }
    }

    /// Builds a manager talking to the HTTP service described by `config`.
    pub fn connect(config: &ClientConfig, document_id: DocumentId) -> DocchatResult<Self> {
        let api = Arc::new(HttpDocumentApi::new(config.clone())?);
        Ok(Self::new(api, document_id, config))
    }

    /// The document this conversation is about.
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// Receiver for transcript change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    // --- Draft (pending-question slot) ---

    /// Replaces the pending-question slot.
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state.lock().draft = text.into();
    }

    /// Current contents of the pending-question slot.
    pub fn draft(&self) -> String {
        self.state.lock().draft.clone()
    }

    // --- Submission ---

    /// Submits whatever is currently in the draft.
    pub async fn submit_draft(&self) -> DocchatResult<String> {
        let question = self.draft();
        self.submit(question).await
    }

    /// Asks one question and returns the answer.
    ///
    /// The turn is visible in the transcript as soon as this is called. On
    /// success the turn is answered and the draft is cleared if it still
    /// holds this question. On failure the turn is marked failed, the draft
    /// is left as typed, and the error is returned. If the returned future
    /// is dropped before the answer arrives, the turn is marked failed with
    /// [`CANCELLED_REASON`] so it never stays pending.
    pub async fn submit(&self, question: impl Into<String>) -> DocchatResult<String> {
        let question = question.into();
        let turn_id = self.begin(&question)?;
        let in_flight = InFlight {
            manager: self,
            turn_id,
            armed: true,
        };

        let result = self.api.ask(&self.document_id, &question).await;
        in_flight.disarm();

        match result {
            Ok(answer) => {
                self.complete(
                    turn_id,
                    TurnStatus::Answered {
                        text: answer.clone(),
                    },
                    Some(&question),
                )?;
                Ok(answer)
            }
            Err(e) => {
                error!(
                    document_id = %self.document_id,
                    turn_id = %turn_id,
                    error = %e,
                    "Error asking question"
                );
                self.complete(
                    turn_id,
                    TurnStatus::Failed {
                        reason: e.to_string(),
                    },
                    None,
                )?;
                Err(e)
            }
        }
    }

    /// Optimistic insert: validates, appends a pending turn, and redraws.
    fn begin(&self, question: &str) -> DocchatResult<TurnId> {
        let turn_id = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(DocchatError::Disposed);
            }
            if self.policy == SubmitPolicy::Serialize && state.transcript.pending_count() > 0 {
                return Err(DocchatError::Busy);
            }
            let turn_id = state.transcript.push(question)?;
            let ConversationState {
                transcript, view, ..
            } = &mut *state;
            view.layout(transcript.turns());
            turn_id
        };

        debug!(document_id = %self.document_id, turn_id = %turn_id, "Turn submitted");
        self.publish(ConversationEvent::TurnAdded {
            turn_id,
            question: question.to_string(),
        });
        Ok(turn_id)
    }

    /// Writes the outcome into its turn. Outcomes arriving after `close`
    /// are dropped.
    fn complete(
        &self,
        turn_id: TurnId,
        outcome: TurnStatus,
        clear_draft_if: Option<&str>,
    ) -> DocchatResult<()> {
        let event = match &outcome {
            TurnStatus::Answered { .. } => ConversationEvent::TurnAnswered { turn_id },
            TurnStatus::Failed { reason } => ConversationEvent::TurnFailed {
                turn_id,
                reason: reason.clone(),
            },
            TurnStatus::Pending => return Ok(()),
        };

        {
            let mut state = self.state.lock();
            if state.closed {
                debug!(turn_id = %turn_id, "Discarding result for closed conversation");
                return Ok(());
            }
            state.transcript.resolve(turn_id, outcome)?;
            if clear_draft_if.is_some_and(|q| state.draft == q) {
                state.draft.clear();
            }
            let ConversationState {
                transcript, view, ..
            } = &mut *state;
            view.layout(transcript.turns());
        }

        self.publish(event);
        Ok(())
    }

    fn publish(&self, event: ConversationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// The draft, if it is worth offering for resubmission: non-empty and
    /// not currently waiting for an answer.
    pub fn retryable_draft(&self) -> Option<String> {
        let state = self.state.lock();
        if state.draft.trim().is_empty() {
            return None;
        }
        let in_flight = state
            .transcript
            .turns()
            .iter()
            .any(|t| t.is_pending() && t.question() == state.draft);
        (!in_flight).then(|| state.draft.clone())
    }

    // --- Lifecycle ---

    /// Detaches the transcript. Requests still in flight are not cancelled,
    /// but their results are no longer written.
    pub fn close(&self) {
        let was_open = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.closed, true)
        };
        if was_open {
            info!(document_id = %self.document_id, "Conversation closed");
            self.publish(ConversationEvent::Closed);
        }
    }

    /// True once [`ConversationManager::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    // --- Read access ---

    /// Copy of every turn in submission order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.state.lock().transcript.turns().to_vec()
    }

    /// Copy of one turn by id.
    pub fn turn(&self, id: TurnId) -> Option<Turn> {
        self.state.lock().transcript.get(id).cloned()
    }

    /// Turns still waiting for an answer.
    pub fn pending_count(&self) -> usize {
        self.state.lock().transcript.pending_count()
    }

    // --- View ---

    /// Lines currently inside the viewport.
    pub fn render(&self) -> Vec<String> {
        self.state.lock().view.visible_lines().to_vec()
    }

    /// Where the viewport sits in the laid-out transcript.
    pub fn scroll_position(&self) -> ScrollPosition {
        self.state.lock().view.position()
    }

    /// Moves the viewport towards older turns.
    pub fn scroll_up(&self, rows: usize) {
        self.state.lock().view.scroll_up(rows);
    }

    /// Moves the viewport towards newer turns.
    pub fn scroll_down(&self, rows: usize) {
        self.state.lock().view.scroll_down(rows);
    }
}

/// Resolves its turn as cancelled when dropped while still armed.
struct InFlight<'a> {
    manager: &'a ConversationManager,
    turn_id: TurnId,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            document_id = %self.manager.document_id,
            turn_id = %self.turn_id,
            "Question dropped before its answer arrived"
        );
        let outcome = TurnStatus::Failed {
            reason: CANCELLED_REASON.to_string(),
        };
        // Already resolved or unknown: nothing left to release.
        let _ = self.manager.complete(self.turn_id, outcome, None);
    }
}
