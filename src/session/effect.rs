//! Effects produced by state transitions

use super::message::MessageDraft;
use crate::classifier::ClassifyRequest;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage(MessageDraft),

    /// Send one classification request (runs as a background task)
    RequestClassification { request: ClassifyRequest },
}

impl Effect {
    pub fn append(draft: MessageDraft) -> Self {
        Effect::AppendMessage(draft)
    }
}
