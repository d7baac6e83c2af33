//! Common types for severity classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRequest {
    /// Raw user input, exactly as typed
    pub text: String,
    /// Selected language code, present only when language forwarding is enabled
    pub language: Option<String>,
}

impl ClassifyRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Severity label returned by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Anything the service returned that is not one of the four known labels
    Unrecognized(String),
}

impl Severity {
    /// Parse a label case-insensitively. Never fails.
    ///
    /// Unlike an exact string comparison, surrounding whitespace is ignored,
    /// so `" high "` is `High`. Anything else keeps its raw text as
    /// `Unrecognized`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Unrecognized(label.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifier result
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub severity: Severity,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Classification {
    pub fn new(severity: Severity, confidence: f64) -> Self {
        Self {
            severity,
            confidence,
        }
    }
}

// ============================================================================
// Wire format for the `/predict` endpoint
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
}

impl<'a> From<&'a ClassifyRequest> for PredictRequest<'a> {
    fn from(request: &'a ClassifyRequest) -> Self {
        Self {
            text: &request.text,
            language: request.language.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    pub predicted_severity: String,
    pub confidence: f64,
}
