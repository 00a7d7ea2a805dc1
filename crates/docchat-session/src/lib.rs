//! Conversation state for one uploaded document.
//!
//! - [`UploadSession`] sends a file and hands the resulting document id on
//!   as a [`Route`](docchat_core::Route).
//! - [`ConversationManager`] owns the [`Transcript`] for that id, submits
//!   questions and writes each answer into the turn that asked it.
//! - [`TranscriptView`] lays the transcript out as bottom-anchored lines.

/// Per-document question and answer flow.
pub mod conversation;
/// Ordered turns of one conversation.
pub mod transcript;
/// Upload form state.
pub mod upload;
/// Bottom-anchored viewport over the transcript.
pub mod view;

pub use conversation::{ConversationEvent, ConversationManager, CANCELLED_REASON};
pub use transcript::Transcript;
pub use upload::{UploadSession, UploadState};
pub use view::{ScrollPosition, TranscriptView};
