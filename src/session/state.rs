//! Session state types

use crate::config::SessionConfig;
use serde::{Deserialize, Serialize};

/// Session state
///
/// `AwaitingResponse` is the busy flag: exactly one classification is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for user input, no pending request
    #[default]
    Idle,

    /// Classification request in flight
    AwaitingResponse,
}

impl SessionState {
    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::AwaitingResponse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingResponse => "awaiting_response",
        }
    }
}

/// Data the transition function reads but never changes
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    /// Language code selected in the view
    pub language: String,
    /// Whether `language` goes out with classification requests
    pub send_language: bool,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, config: &SessionConfig) -> Self {
        Self {
            session_id: session_id.into(),
            language: config.language.clone(),
            send_language: config.send_language,
        }
    }
}
