//! VitalAI chat
//!
//! A conversation session for symptom triage: the user describes symptoms,
//! an external classifier rates their severity, and the session appends a
//! formatted reply. Files and appointments can be attached to the transcript.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod classifier;
pub mod config;
pub mod intake;
pub mod runtime;
pub mod session;
pub mod view;
