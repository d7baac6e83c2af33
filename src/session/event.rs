//! Events that can occur in a session

use super::message::{AppointmentDetails, FileInfo};
use crate::classifier::{Classification, ClassifyErrorKind};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
    },
    FileAttached {
        file: FileInfo,
    },
    AppointmentAttached {
        appointment: AppointmentDetails,
    },

    // Classifier events
    ClassificationComplete {
        classification: Classification,
    },
    ClassificationFailed {
        message: String,
        kind: ClassifyErrorKind,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserSubmit { .. } => "user_submit",
            Event::FileAttached { .. } => "file_attached",
            Event::AppointmentAttached { .. } => "appointment_attached",
            Event::ClassificationComplete { .. } => "classification_complete",
            Event::ClassificationFailed { .. } => "classification_failed",
        }
    }
}
