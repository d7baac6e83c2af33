//! Session runtime executor

use super::{Command, SessionUpdate};
use crate::classifier::{Classifier, ClassifyError};
use crate::session::{transition, Effect, Event, MessageDraft, SessionContext, SessionState, Transcript};
use chrono::Utc;
use std::sync::{Arc, RwLock};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

/// Owns one session: applies events in order and executes their effects
pub struct SessionRuntime<C>
where
    C: Classifier + 'static,
{
    context: SessionContext,
    state: SessionState,
    transcript: Arc<RwLock<Transcript>>,
    classifier: Arc<C>,
    command_rx: mpsc::Receiver<Command>,
    /// Handed to classification tasks so they can report back
    command_tx: mpsc::Sender<Command>,
    state_tx: watch::Sender<SessionState>,
    updates_tx: broadcast::Sender<SessionUpdate>,
    /// Cancelled when the view unmounts
    unmounted: CancellationToken,
}

impl<C> SessionRuntime<C>
where
    C: Classifier + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        context: SessionContext,
        transcript: Arc<RwLock<Transcript>>,
        classifier: Arc<C>,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::Sender<Command>,
        state_tx: watch::Sender<SessionState>,
        updates_tx: broadcast::Sender<SessionUpdate>,
        unmounted: CancellationToken,
    ) -> Self {
        Self {
            context,
            state: SessionState::Idle,
            transcript,
            classifier,
            command_rx,
            command_tx,
            state_tx,
            updates_tx,
            unmounted,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            classifier = self.classifier.name(),
            "Session mounted"
        );

        loop {
            tokio::select! {
                biased;

                () = self.unmounted.cancelled() => break,

                Some(command) = self.command_rx.recv() => {
                    self.handle_command(command);
                }

                else => break,
            }
        }

        if self.state.is_busy() {
            tracing::info!(
                session_id = %self.context.session_id,
                "Unmounted with a classification in flight, its result will be dropped"
            );
        }
        tracing::info!(session_id = %self.context.session_id, "Session unmounted");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Dispatch { event, ack } => self.process_event(event, ack),
            Command::SetLanguage { code } => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    language = %code,
                    forwarded = self.context.send_language,
                    "Language selected"
                );
                self.context.language = code;
            }
        }
    }

    fn process_event(
        &mut self,
        event: Event,
        ack: Option<oneshot::Sender<Result<(), crate::session::TransitionError>>>,
    ) {
        let event_name = event.name();

        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    event = event_name,
                    state = self.state.as_str(),
                    error = %e,
                    "Event rejected"
                );
                let _ = self.updates_tx.send(SessionUpdate::Rejected {
                    reason: e.clone(),
                });
                if let Some(ack) = ack {
                    let _ = ack.send(Err(e));
                }
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);

        for effect in result.effects {
            self.execute_effect(effect);
        }

        if old_state != self.state {
            tracing::debug!(
                session_id = %self.context.session_id,
                from = old_state.as_str(),
                to = self.state.as_str(),
                "State changed"
            );
            self.state_tx.send_replace(self.state);
            let _ = self.updates_tx.send(SessionUpdate::BusyChanged {
                busy: self.state.is_busy(),
            });
        }

        // Acknowledge only once the transcript reflects the event
        if let Some(ack) = ack {
            let _ = ack.send(Ok(()));
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage(draft) => self.append(draft),

            Effect::RequestClassification { request } => {
                let classifier = self.classifier.clone();
                let command_tx = self.command_tx.clone();
                let unmounted = self.unmounted.clone();
                let session_id = self.context.session_id.clone();

                tokio::spawn(async move {
                    tracing::debug!(session_id = %session_id, "Requesting classification (background)");

                    // A panicking classifier must still release the busy flag
                    let outcome =
                        tokio::spawn(async move { classifier.classify(&request).await }).await;

                    let event = match outcome {
                        Ok(Ok(classification)) => Event::ClassificationComplete { classification },
                        Ok(Err(e)) => Event::ClassificationFailed {
                            message: e.message,
                            kind: e.kind,
                        },
                        Err(join_error) => {
                            tracing::error!(
                                session_id = %session_id,
                                error = %join_error,
                                "Classification task did not complete"
                            );
                            let e = ClassifyError::internal(format!(
                                "Classification task did not complete: {join_error}"
                            ));
                            Event::ClassificationFailed {
                                message: e.message,
                                kind: e.kind,
                            }
                        }
                    };

                    // The view may have gone away while we waited
                    if unmounted.is_cancelled() {
                        tracing::debug!(
                            session_id = %session_id,
                            event = event.name(),
                            "Session unmounted, discarding classification result"
                        );
                        return;
                    }

                    if command_tx
                        .send(Command::Dispatch { event, ack: None })
                        .await
                        .is_err()
                    {
                        tracing::debug!(session_id = %session_id, "Session stopped before result arrived");
                    }
                });
            }
        }
    }

    fn append(&self, draft: MessageDraft) {
        let message = {
            let mut transcript = match self.transcript.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            transcript.append(draft, Utc::now()).clone()
        };

        tracing::debug!(
            session_id = %self.context.session_id,
            message_id = message.id.0,
            sender = ?message.sender,
            "Message appended"
        );
        let _ = self.updates_tx.send(SessionUpdate::MessageAppended { message });
    }
}
