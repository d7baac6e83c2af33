//! Transcript and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-session message id, assigned in append order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// File metadata handed over by the file picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Appointment fields handed over by the appointment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub department: String,
    pub date: String,
    pub time: String,
    pub patient_name: String,
    #[serde(default)]
    pub reason: String,
}

/// What a message refers to, beyond its display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    PlainText,
    FileReference { file: FileInfo },
    AppointmentReference { appointment: AppointmentDetails },
}

/// A message before the transcript has given it an id and a timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub text: String,
    pub sender: Sender,
    pub kind: MessageKind,
}

impl MessageDraft {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            kind: MessageKind::PlainText,
        }
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            kind: MessageKind::PlainText,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: MessageKind,
}

/// Append-only, insertion-ordered message list for one session
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, stamping it with the next id and `timestamp`
    pub fn append(&mut self, draft: MessageDraft, timestamp: DateTime<Utc>) -> &Message {
        self.next_id += 1;
        self.messages.push(Message {
            id: MessageId(self.next_id),
            text: draft.text,
            sender: draft.sender,
            timestamp,
            kind: draft.kind,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
