//! Intake collaborators: the file picker, the appointment form and the
//! language list
//!
//! These validate user-supplied data before it reaches a session. The
//! session itself trusts whatever they hand over.

mod appointment;
mod file;
mod language;

pub use appointment::{AppointmentForm, DEPARTMENTS, TIME_SLOTS};
pub use file::{file_from_path, format_file_size, validate_file, ALLOWED_TYPES, MAX_FILE_SIZE};
pub use language::{find_language, Language, LANGUAGES};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please select a valid file type (JPEG, PNG, GIF, or PDF), got {0}")]
    UnsupportedType(String),
    #[error("File size must be less than 5MB, got {0} bytes")]
    TooLarge(u64),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Please fill in all required fields (missing {0})")]
    MissingField(&'static str),
    #[error("Unknown department: {0}")]
    UnknownDepartment(String),
    #[error("Unavailable time slot: {0}")]
    UnknownTimeSlot(String),
    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Appointments can only be booked from tomorrow onwards, got {0}")]
    DateNotInFuture(String),
    #[error("Unsupported language code: {0}")]
    UnknownLanguage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
