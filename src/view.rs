//! Terminal presentation layer
//!
//! Turns input lines into actions against a session. Which overlay is open
//! (file upload prompt, appointment form) lives here, never in the session.

use crate::intake::{find_language, format_file_size, AppointmentForm, DEPARTMENTS, LANGUAGES, TIME_SLOTS};
use crate::session::{AppointmentDetails, Message, MessageKind, Sender};
use chrono::{Local, NaiveDate};
use std::fmt::Write as _;
use std::path::PathBuf;

pub const HELP: &str = "\
Describe your symptoms and press enter.
  /attach [path]        upload a medical document
  /appointment          schedule an appointment (step by step)
  /appointment <department>|<YYYY-MM-DD>|<HH:MM>|<patient name>|<reason>
  /lang <code>          change language
  /languages            list languages
  /cancel               close the open form
  /quit                 leave the chat";

/// Which overlay, if any, is capturing input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    Chatting,
    UploadingFile,
    Scheduling {
        form: AppointmentForm,
        field: FormField,
    },
}

/// Appointment form fields, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Department,
    Date,
    Time,
    PatientName,
    Reason,
}

impl FormField {
    fn next(self) -> Option<Self> {
        match self {
            FormField::Department => Some(FormField::Date),
            FormField::Date => Some(FormField::Time),
            FormField::Time => Some(FormField::PatientName),
            FormField::PatientName => Some(FormField::Reason),
            FormField::Reason => None,
        }
    }

    fn prompt(self) -> String {
        match self {
            FormField::Department => format!("Department ({}):", DEPARTMENTS.join(", ")),
            FormField::Date => "Date (YYYY-MM-DD, from tomorrow):".to_string(),
            FormField::Time => format!("Time ({}):", TIME_SLOTS.join(", ")),
            FormField::PatientName => "Patient name:".to_string(),
            FormField::Reason => "Reason for visit (optional):".to_string(),
        }
    }

    fn fill(self, form: &mut AppointmentForm, value: &str) {
        let value = value.trim().to_string();
        match self {
            FormField::Department => form.department = value,
            FormField::Date => form.date = value,
            FormField::Time => form.time = value,
            FormField::PatientName => form.patient_name = value,
            FormField::Reason => form.reason = value,
        }
    }
}

/// What the view asks the surrounding program to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    AttachFile(PathBuf),
    AttachAppointment(AppointmentDetails),
    SetLanguage(String),
    Print(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct View {
    state: ViewState,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Handle one input line. `today` bounds appointment dates.
    pub fn handle_line(&mut self, line: &str, today: NaiveDate) -> Vec<Action> {
        let trimmed = line.trim();
        if trimmed == "/cancel" && self.state != ViewState::Chatting {
            self.state = ViewState::Chatting;
            return vec![Action::Print("Cancelled.".to_string())];
        }

        match std::mem::take(&mut self.state) {
            ViewState::Chatting => self.handle_chat_line(line, today),

            ViewState::UploadingFile => {
                if trimmed.is_empty() {
                    vec![Action::Print("Upload cancelled.".to_string())]
                } else {
                    vec![Action::AttachFile(PathBuf::from(trimmed))]
                }
            }

            ViewState::Scheduling { mut form, field } => {
                field.fill(&mut form, trimmed);
                if let Some(next) = field.next() {
                    self.state = ViewState::Scheduling { form, field: next };
                    vec![Action::Print(next.prompt())]
                } else {
                    vec![submit_form(form, today)]
                }
            }
        }
    }

    fn handle_chat_line(&mut self, line: &str, today: NaiveDate) -> Vec<Action> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return vec![];
        }
        if !trimmed.starts_with('/') {
            return vec![Action::Submit(line.to_string())];
        }

        let (command, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(c, r)| (c, r.trim()));

        match command {
            "/quit" | "/exit" => vec![Action::Quit],
            "/help" => vec![Action::Print(HELP.to_string())],
            "/languages" => vec![Action::Print(language_list())],
            "/lang" => match find_language(rest) {
                Ok(lang) => vec![
                    Action::SetLanguage(lang.code.to_string()),
                    Action::Print(format!("Language set to {} ({}).", lang.name, lang.native)),
                ],
                Err(e) => vec![Action::Print(e.to_string())],
            },
            "/attach" if rest.is_empty() => {
                self.state = ViewState::UploadingFile;
                vec![Action::Print(
                    "Path of the document to upload (JPEG, PNG, GIF or PDF, max 5MB), empty line to cancel:"
                        .to_string(),
                )]
            }
            "/attach" => vec![Action::AttachFile(PathBuf::from(rest))],
            "/appointment" if rest.is_empty() => {
                let field = FormField::Department;
                self.state = ViewState::Scheduling {
                    form: AppointmentForm::default(),
                    field,
                };
                vec![Action::Print(field.prompt())]
            }
            "/appointment" => vec![submit_form(parse_inline_form(rest), today)],
            other => vec![Action::Print(format!(
                "Unknown command {other}, type /help for a list"
            ))],
        }
    }
}

fn submit_form(form: AppointmentForm, today: NaiveDate) -> Action {
    match form.submit(today) {
        Ok(details) => Action::AttachAppointment(details),
        Err(e) => Action::Print(format!("{e}. Use /appointment to try again.")),
    }
}

/// `department|date|time|patient|reason`, trailing fields may be omitted
fn parse_inline_form(rest: &str) -> AppointmentForm {
    let mut parts = rest.split('|').map(|p| p.trim().to_string());
    AppointmentForm {
        department: parts.next().unwrap_or_default(),
        date: parts.next().unwrap_or_default(),
        time: parts.next().unwrap_or_default(),
        patient_name: parts.next().unwrap_or_default(),
        reason: parts.next().unwrap_or_default(),
    }
}

fn language_list() -> String {
    let mut out = String::new();
    for lang in LANGUAGES {
        let _ = writeln!(out, "  {:<5} {} ({})", lang.code, lang.name, lang.native);
    }
    out.trim_end().to_string()
}

/// One transcript line, decorated by message kind
pub fn render_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "VitalAI",
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    match &message.kind {
        MessageKind::PlainText => format!("[{time}] {who}: {}", message.text),
        MessageKind::FileReference { file } => format!(
            "[{time}] {who}: 📎 {} ({})",
            message.text,
            format_file_size(file.size)
        ),
        MessageKind::AppointmentReference { appointment } => format!(
            "[{time}] {who}: 📅 {} at {}",
            message.text, appointment.time
        ),
    }
}
