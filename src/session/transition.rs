//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. No clock, no I/O: the runtime stamps messages and performs requests.

use super::message::{MessageDraft, MessageKind, Sender};
use super::reply::{appointment_reference_text, file_reference_text, format_reply, FALLBACK_REPLY};
use super::{Effect, Event, SessionContext, SessionState};
use crate::classifier::ClassifyRequest;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
///
/// Every variant means "nothing happened": state and transcript are untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A reply is still pending, wait for it before sending another message")]
    Busy,
    #[error("Message is empty")]
    EmptyInput,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // User input
        // ============================================================

        // At most one request in flight
        (SessionState::AwaitingResponse, Event::UserSubmit { .. }) => Err(TransitionError::Busy),

        (SessionState::Idle, Event::UserSubmit { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyInput);
            }
            let request = build_request(context, &text);
            Ok(TransitionResult::new(SessionState::AwaitingResponse)
                .with_effect(Effect::append(MessageDraft::user_text(text)))
                .with_effect(Effect::RequestClassification { request }))
        }

        // Attachments never touch the network and are accepted in any state
        (state, Event::FileAttached { file }) => Ok(TransitionResult::new(*state).with_effect(
            Effect::append(MessageDraft {
                text: file_reference_text(&file),
                sender: Sender::User,
                kind: MessageKind::FileReference { file },
            }),
        )),

        (state, Event::AppointmentAttached { appointment }) => Ok(TransitionResult::new(*state)
            .with_effect(Effect::append(MessageDraft {
                text: appointment_reference_text(&appointment),
                sender: Sender::User,
                kind: MessageKind::AppointmentReference { appointment },
            }))),

        // ============================================================
        // Classifier results
        // ============================================================
        (SessionState::AwaitingResponse, Event::ClassificationComplete { classification }) => {
            Ok(TransitionResult::new(SessionState::Idle).with_effect(Effect::append(
                MessageDraft::bot_text(format_reply(&classification)),
            )))
        }

        (SessionState::AwaitingResponse, Event::ClassificationFailed { .. }) => {
            Ok(TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::append(MessageDraft::bot_text(FALLBACK_REPLY))))
        }

        (
            SessionState::Idle,
            event @ (Event::ClassificationComplete { .. } | Event::ClassificationFailed { .. }),
        ) => Err(TransitionError::InvalidTransition(format!(
            "{} with no request in flight",
            event.name()
        ))),
    }
}

fn build_request(context: &SessionContext, text: &str) -> ClassifyRequest {
    let request = ClassifyRequest::new(text);
    if context.send_language {
        request.with_language(context.language.clone())
    } else {
        request
    }
}
