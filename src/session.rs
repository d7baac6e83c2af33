//! Conversation session state machine
//!
//! Elm-style: a pure `transition` turns (state, event) into a new state plus
//! effects, and the runtime executes the effects.

mod effect;
pub mod event;
pub mod message;
pub mod reply;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use message::{
    AppointmentDetails, FileInfo, Message, MessageDraft, MessageId, MessageKind, Sender,
    Transcript,
};
pub use state::{SessionContext, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};
