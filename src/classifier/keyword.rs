//! Deterministic offline classifier
//!
//! Matches lower-cased input against fixed keyword lists. Useful for demos
//! without the prediction service and for tests that need stable answers.

use super::types::{Classification, ClassifyRequest, Severity};
use super::{ClassifyError, Classifier};
use async_trait::async_trait;

const CRITICAL_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "chest pain",
    "unconscious",
    "can't breathe",
    "cannot breathe",
];
const HIGH_KEYWORDS: &[&str] = &["fever", "temperature", "bleeding", "vomiting"];
const MEDIUM_KEYWORDS: &[&str] = &["headache", "pain", "dizzy", "rash"];

/// Keyword tiers, checked most severe first
fn tiers() -> [(Severity, f64, &'static [&'static str]); 3] {
    [
        (Severity::Critical, 0.95, CRITICAL_KEYWORDS),
        (Severity::High, 0.8, HIGH_KEYWORDS),
        (Severity::Medium, 0.65, MEDIUM_KEYWORDS),
    ]
}

const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_text(text: &str) -> Classification {
        let input = text.to_lowercase();
        for (severity, confidence, keywords) in tiers() {
            if keywords.iter().any(|k| input.contains(k)) {
                return Classification::new(severity, confidence);
            }
        }
        Classification::new(Severity::Low, DEFAULT_CONFIDENCE)
    }
}

#[async_trait]
impl Classifier for KeywordClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        Ok(Self::classify_text(&request.text))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
