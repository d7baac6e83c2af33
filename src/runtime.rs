//! Runtime for mounted chat sessions
//!
//! `mount` spawns one task per session and returns the handle the view uses
//! to submit input, attach files and appointments, and observe the transcript.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;

use crate::classifier::Classifier;
use crate::config::SessionConfig;
use crate::session::{
    AppointmentDetails, Event, FileInfo, Message, MessageDraft, SessionContext, SessionState,
    Transcript, TransitionError,
};
use chrono::Utc;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Inbound work for a session runtime
#[derive(Debug)]
pub(crate) enum Command {
    Dispatch {
        event: Event,
        /// Present for view-originated events; answered after effects ran
        ack: Option<oneshot::Sender<Result<(), TransitionError>>>,
    },
    SetLanguage {
        code: String,
    },
}

/// Notifications for the view
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    MessageAppended { message: Message },
    BusyChanged { busy: bool },
    Rejected { reason: TransitionError },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Session is no longer mounted")]
    Unmounted,
}

/// Handle to interact with a mounted session
///
/// Dropping the handle unmounts the session.
pub struct SessionHandle {
    session_id: String,
    command_tx: mpsc::Sender<Command>,
    transcript: Arc<RwLock<Transcript>>,
    state_rx: watch::Receiver<SessionState>,
    updates_tx: broadcast::Sender<SessionUpdate>,
    unmounted: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Mount a new session backed by `classifier`
///
/// Must be called from within a tokio runtime.
pub fn mount<C>(config: &SessionConfig, classifier: C) -> SessionHandle
where
    C: Classifier + 'static,
{
    let session_id = uuid::Uuid::new_v4().to_string();
    let context = SessionContext::new(session_id.clone(), config);

    let mut transcript = Transcript::new();
    if let Some(greeting) = &config.greeting {
        transcript.append(MessageDraft::bot_text(greeting.clone()), Utc::now());
    }
    let transcript = Arc::new(RwLock::new(transcript));

    let (command_tx, command_rx) = mpsc::channel(32);
    let (state_tx, state_rx) = watch::channel(SessionState::Idle);
    let (updates_tx, _) = broadcast::channel(128);
    let unmounted = CancellationToken::new();

    let runtime = SessionRuntime::new(
        context,
        transcript.clone(),
        Arc::new(classifier),
        command_rx,
        command_tx.clone(),
        state_tx,
        updates_tx.clone(),
        unmounted.clone(),
    );
    let task = tokio::spawn(runtime.run());

    SessionHandle {
        session_id,
        command_tx,
        transcript,
        state_rx,
        updates_tx,
        unmounted,
        task: Some(task),
    }
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Submit free text for classification
    ///
    /// On `Ok` the user message is already in the transcript and the session
    /// is busy; the reply arrives later. Empty input and input while busy are
    /// rejected without touching the transcript.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.dispatch(Event::UserSubmit { text: text.into() }).await
    }

    /// Append a file-reference message. No upload happens.
    pub async fn attach_file(&self, file: FileInfo) -> Result<(), SessionError> {
        self.dispatch(Event::FileAttached { file }).await
    }

    /// Append an appointment-reference message
    pub async fn attach_appointment(
        &self,
        appointment: AppointmentDetails,
    ) -> Result<(), SessionError> {
        self.dispatch(Event::AppointmentAttached { appointment }).await
    }

    /// Record the language selected in the view
    pub async fn set_language(&self, code: impl Into<String>) -> Result<(), SessionError> {
        self.command_tx
            .send(Command::SetLanguage { code: code.into() })
            .await
            .map_err(|_| SessionError::Unmounted)
    }

    async fn dispatch(&self, event: Event) -> Result<(), SessionError> {
        if self.unmounted.is_cancelled() {
            return Err(SessionError::Unmounted);
        }
        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Dispatch {
                event,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| SessionError::Unmounted)?;
        // The runtime drops the ack unanswered if it stops first
        ack_rx.await.map_err(|_| SessionError::Unmounted)??;
        Ok(())
    }

    /// Snapshot of the transcript in insertion order
    pub fn transcript(&self) -> Vec<Message> {
        match self.transcript.read() {
            Ok(guard) => guard.messages().to_vec(),
            Err(poisoned) => poisoned.into_inner().messages().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self.transcript.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_busy(&self) -> bool {
        self.state_rx.borrow().is_busy()
    }

    /// Wait until no classification is in flight
    pub async fn wait_idle(&self) {
        let mut state_rx = self.state_rx.clone();
        // Err means the runtime is gone, which is idle enough
        let _ = state_rx.wait_for(|state| !state.is_busy()).await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates_tx.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.is_cancelled()
    }

    /// Stop the session and wait for its task to finish
    ///
    /// A classification still in flight is not cancelled, but its result is
    /// discarded. The transcript stays readable through this handle.
    pub async fn unmount(&mut self) {
        self.unmounted.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(session_id = %self.session_id, error = %e, "Session task ended abnormally");
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.unmounted.cancel();
    }
}
