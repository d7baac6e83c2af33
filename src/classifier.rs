//! Severity classifier abstraction
//!
//! One interface, two implementations: the HTTP-backed prediction service
//! and a deterministic keyword matcher. Which one a session gets is decided
//! by configuration.

mod error;
mod http;
mod keyword;
mod types;

pub use error::{ClassifyError, ClassifyErrorKind};
pub use http::HttpClassifier;
pub use keyword::KeywordClassifier;
pub use types::{Classification, ClassifyRequest, Severity};

use crate::config::{ClassifierBackend, ClassifierConfig};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for severity classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one piece of user input
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        (**self).classify(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for classifiers
pub struct LoggingClassifier {
    inner: Arc<dyn Classifier>,
    name: String,
}

impl LoggingClassifier {
    pub fn new(inner: Arc<dyn Classifier>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl Classifier for LoggingClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        let start = std::time::Instant::now();
        let result = self.inner.classify(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(classification) => {
                tracing::info!(
                    backend = %self.name,
                    duration_ms = %duration.as_millis(),
                    severity = %classification.severity,
                    confidence = classification.confidence,
                    "Classification completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    backend = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    transport = e.kind.is_transport(),
                    status = ?e.status,
                    "Classification failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build the configured classifier, wrapped for logging
pub fn from_config(config: &ClassifierConfig) -> Arc<dyn Classifier> {
    let inner: Arc<dyn Classifier> = match config.backend {
        ClassifierBackend::Http => Arc::new(HttpClassifier::new(&config.api_url)),
        ClassifierBackend::Keyword => Arc::new(KeywordClassifier::new()),
    };
    Arc::new(LoggingClassifier::new(inner))
}
