//! Display text for bot replies and attachment messages

use super::message::{AppointmentDetails, FileInfo};
use crate::classifier::{Classification, Severity};

/// Appended when classification fails for any reason
pub const FALLBACK_REPLY: &str = "⚠️ Sorry, I couldn't process that right now. Please try again.";

/// Reply for a successful classification, confidence rendered to two decimals
pub fn format_reply(classification: &Classification) -> String {
    let conf = format!("{:.2}", classification.confidence);
    match classification.severity {
        Severity::Low => format!(
            "Your condition appears to be *low severity*. It’s likely mild, but monitor your symptoms and rest. (Confidence: {conf})"
        ),
        Severity::Medium => format!(
            "This condition may be of *moderate concern*. You should monitor symptoms and consult a doctor if needed. (Confidence: {conf})"
        ),
        Severity::High => format!(
            "Your symptoms suggest a *high severity* condition. Please seek medical advice soon. (Confidence: {conf})"
        ),
        Severity::Critical => format!(
            "⚠️ *Critical severity detected.* Please seek *immediate medical attention*. (Confidence: {conf})"
        ),
        Severity::Unrecognized(_) => {
            format!("I couldn’t determine severity confidently. (Confidence: {conf})")
        }
    }
}

pub fn file_reference_text(file: &FileInfo) -> String {
    format!("Uploaded file: {}", file.name)
}

pub fn appointment_reference_text(appointment: &AppointmentDetails) -> String {
    format!(
        "Appointment scheduled for {} in {}",
        appointment.date, appointment.department
    )
}
