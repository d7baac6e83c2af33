//! Appointment form

use super::IntakeError;
use crate::session::AppointmentDetails;
use chrono::NaiveDate;

pub const DEPARTMENTS: &[&str] = &[
    "General Practice",
    "Pediatrics",
    "Emergency",
    "Cardiology",
    "Dermatology",
    "Orthopedics",
    "Dental",
];

pub const TIME_SLOTS: &[&str] = &[
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30",
];

/// Raw form fields as the user typed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub department: String,
    pub date: String,
    pub time: String,
    pub patient_name: String,
    pub reason: String,
}

impl AppointmentForm {
    /// Validate against `today` and produce the details a session accepts
    ///
    /// Department, date, time and patient name are required; reason is not.
    pub fn submit(self, today: NaiveDate) -> Result<AppointmentDetails, IntakeError> {
        let department = required(&self.department, "department")?;
        let date = required(&self.date, "date")?;
        let time = required(&self.time, "time")?;
        let patient_name = required(&self.patient_name, "patient name")?;

        let department = DEPARTMENTS
            .iter()
            .find(|d| d.eq_ignore_ascii_case(department))
            .ok_or_else(|| IntakeError::UnknownDepartment(department.to_string()))?;

        if !TIME_SLOTS.contains(&time) {
            return Err(IntakeError::UnknownTimeSlot(time.to_string()));
        }

        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| IntakeError::InvalidDate(date.to_string()))?;
        if parsed <= today {
            return Err(IntakeError::DateNotInFuture(date.to_string()));
        }

        Ok(AppointmentDetails {
            department: (*department).to_string(),
            date: parsed.format("%Y-%m-%d").to_string(),
            time: time.to_string(),
            patient_name: patient_name.to_string(),
            reason: self.reason.trim().to_string(),
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, IntakeError> {
    let value = value.trim();
    if value.is_empty() {
        Err(IntakeError::MissingField(field))
    } else {
        Ok(value)
    }
}
