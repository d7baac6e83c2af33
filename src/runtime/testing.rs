//! Mock implementations for testing
//!
//! These mocks drive a real session runtime without any network I/O.

use super::*;
use crate::classifier::{Classification, ClassifyError, ClassifyRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Semaphore;

// ============================================================================
// Mock Classifier
// ============================================================================

/// Mock classifier that returns queued results
///
/// When gated, every call blocks until `release` is called, which keeps the
/// session busy for as long as a test needs.
pub struct MockClassifier {
    responses: Mutex<VecDeque<Result<Classification, ClassifyError>>>,
    gate: Option<Semaphore>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ClassifyRequest>>,
}

#[allow(dead_code)]
impl MockClassifier {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Queue a successful classification
    pub fn queue(&self, classification: Classification) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(classification));
    }

    /// Queue an error
    pub fn queue_error(&self, error: ClassifyError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Let one blocked call proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn recorded_requests(&self) -> Vec<ClassifyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClassifyError::network("No mock response queued")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Classifier that panics on every call
pub struct PanickingClassifier;

#[async_trait]
impl Classifier for PanickingClassifier {
    async fn classify(&self, _request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        panic!("classifier exploded");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

// ============================================================================
// Test Session Builder
// ============================================================================

pub struct TestSession {
    pub handle: SessionHandle,
    pub classifier: Arc<MockClassifier>,
}

pub struct TestSessionBuilder {
    config: SessionConfig,
    classifier: Option<MockClassifier>,
}

impl TestSession {
    /// Start building a session with no greeting and an instant mock
    pub fn builder() -> TestSessionBuilder {
        TestSessionBuilder {
            config: SessionConfig {
                greeting: None,
                ..SessionConfig::default()
            },
            classifier: None,
        }
    }
}

impl TestSessionBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn classifier(mut self, classifier: MockClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> TestSession {
        let classifier = Arc::new(self.classifier.unwrap_or_default());
        let handle = mount(&self.config, classifier.clone());
        TestSession { handle, classifier }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifyErrorKind, Severity};
    use crate::session::reply::FALLBACK_REPLY;
    use crate::session::{MessageKind, Sender};
    use std::time::Duration;

    #[tokio::test]
    async fn test_mock_classifier() {
        let mock = MockClassifier::new();
        mock.queue(Classification::new(Severity::Low, 0.5));

        let request = ClassifyRequest::new("hi");
        assert!(mock.classify(&request).await.is_ok());
        // Nothing queued any more
        assert!(mock.classify(&request).await.is_err());
        assert_eq!(mock.recorded_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_greeting_seeds_transcript() {
        let session = TestSession::builder()
            .config(SessionConfig::default())
            .build();

        let transcript = session.handle.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::Bot);
        assert!(transcript[0].text.starts_with("Hello! I'm VitalAI"));
    }

    #[tokio::test]
    async fn test_submit_appends_user_message_before_reply() {
        let session = TestSession::builder()
            .classifier(MockClassifier::gated())
            .build();
        session.classifier.queue(Classification::new(Severity::Low, 0.83));

        session.handle.submit("mild cough").await.unwrap();

        // Request is still blocked, but the user message is already there
        let transcript = session.handle.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].sender, Sender::User);
        assert_eq!(transcript[0].text, "mild cough");
        assert!(session.handle.is_busy());

        session.classifier.release();
        session.handle.wait_idle().await;

        let transcript = session.handle.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].sender, Sender::Bot);
        assert!(transcript[1].text.contains("low severity"));
        assert!(transcript[1].text.contains("0.83"));
        assert!(!session.handle.is_busy());
    }

    #[tokio::test]
    async fn test_second_submit_while_busy_is_noop() {
        let session = TestSession::builder()
            .classifier(MockClassifier::gated())
            .build();
        session.classifier.queue(Classification::new(Severity::High, 0.7));

        session.handle.submit("fever").await.unwrap();
        let len = session.handle.len();

        let err = session.handle.submit("still feverish").await.unwrap_err();
        assert_eq!(err, SessionError::Rejected(TransitionError::Busy));
        assert_eq!(session.handle.len(), len);

        session.classifier.release();
        session.handle.wait_idle().await;
        assert_eq!(session.classifier.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_critical_reply() {
        let session = TestSession::builder().build();
        session.classifier.queue(Classification::new(Severity::Critical, 0.99));

        session.handle.submit("chest pain").await.unwrap();
        session.handle.wait_idle().await;

        let last = session.handle.transcript().pop().unwrap();
        assert!(last.text.contains("immediate medical attention"));
        assert!(last.text.contains("0.99"));
    }

    #[tokio::test]
    async fn test_unrecognized_severity_reply() {
        let session = TestSession::builder().build();
        session
            .classifier
            .queue(Classification::new(Severity::parse("SEVERE"), 0.42));

        session.handle.submit("hmm").await.unwrap();
        session.handle.wait_idle().await;

        let last = session.handle.transcript().pop().unwrap();
        assert!(last.text.contains("couldn’t determine severity"));
        assert!(last.text.contains("0.42"));
    }

    #[tokio::test]
    async fn test_transport_failure_appends_single_fallback() {
        let session = TestSession::builder().build();
        session
            .classifier
            .queue_error(ClassifyError::network("connection refused"));

        session.handle.submit("hello").await.unwrap();
        session.handle.wait_idle().await;

        let transcript = session.handle.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text, FALLBACK_REPLY);
        assert_eq!(
            transcript.iter().filter(|m| m.text == FALLBACK_REPLY).count(),
            1
        );
        assert!(!session.handle.is_busy());

        // The session is usable again
        session.classifier.queue(Classification::new(Severity::Low, 0.6));
        session.handle.submit("again").await.unwrap();
        session.handle.wait_idle().await;
        assert_eq!(session.handle.len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_response_uses_same_fallback() {
        let session = TestSession::builder().build();
        session
            .classifier
            .queue_error(ClassifyError::malformed("missing confidence"));

        session.handle.submit("hello").await.unwrap();
        session.handle.wait_idle().await;

        assert_eq!(session.handle.transcript()[1].text, FALLBACK_REPLY);
        assert_eq!(
            ClassifyError::malformed("x").kind,
            ClassifyErrorKind::MalformedResponse
        );
    }

    #[tokio::test]
    async fn test_classifier_panic_releases_busy_flag() {
        let config = SessionConfig {
            greeting: None,
            ..SessionConfig::default()
        };
        let handle = mount(&config, PanickingClassifier);

        handle.submit("hello").await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle.wait_idle())
            .await
            .expect("busy flag never released");

        let transcript = handle.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].text, FALLBACK_REPLY);
        assert!(!handle.is_busy());

        // Still accepts input afterwards
        handle.submit("hello again").await.unwrap();
    }

    /// Serve `/predict` on an ephemeral port with a fixed answer
    async fn serve_predict(status: axum::http::StatusCode, body: &'static str) -> String {
        let app = axum::Router::new().route(
            "/predict",
            axum::routing::post(move || async move { (status, body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_http_failures_produce_fallback_reply() {
        use crate::classifier::{self, HttpClassifier};
        use crate::config::{ClassifierBackend, ClassifierConfig};
        use axum::http::StatusCode;

        let config = SessionConfig {
            greeting: None,
            ..SessionConfig::default()
        };

        for (status, body) in [
            (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            (StatusCode::OK, r#"{"predicted_severity":"LOW"}"#),
            (StatusCode::OK, "not json"),
        ] {
            let base = serve_predict(status, body).await;
            let classifier = classifier::from_config(&ClassifierConfig {
                backend: ClassifierBackend::Http,
                api_url: base,
            });
            let handle = mount(&config, classifier);

            handle.submit("sore throat").await.unwrap();
            handle.wait_idle().await;

            let transcript = handle.transcript();
            assert_eq!(transcript.len(), 2, "status {status}, body {body}");
            assert_eq!(transcript[0].text, "sore throat");
            assert_eq!(transcript[1].text, FALLBACK_REPLY);
            assert!(!handle.is_busy());
        }

        // And a good answer goes through the same path
        let base = serve_predict(
            StatusCode::OK,
            r#"{"predicted_severity":"CRITICAL","confidence":0.97}"#,
        )
        .await;
        let handle = mount(&config, HttpClassifier::new(&base));
        handle.submit("chest pain").await.unwrap();
        handle.wait_idle().await;
        assert!(handle.transcript()[1].text.contains("(Confidence: 0.97)"));
    }

    #[tokio::test]
    async fn test_blank_submit_never_changes_transcript() {
        let session = TestSession::builder().build();

        for text in ["", "   "] {
            let err = session.handle.submit(text).await.unwrap_err();
            assert_eq!(err, SessionError::Rejected(TransitionError::EmptyInput));
        }
        assert!(session.handle.is_empty());
        assert!(session.classifier.recorded_requests().is_empty());
    }

    #[tokio::test]
    async fn test_attach_file_appends_without_network() {
        let session = TestSession::builder().build();

        session
            .handle
            .attach_file(FileInfo {
                name: "scan.pdf".to_string(),
                size: 52_000,
                media_type: "application/pdf".to_string(),
            })
            .await
            .unwrap();

        let transcript = session.handle.transcript();
        assert_eq!(transcript.len(), 1);
        assert!(transcript[0].text.contains("scan.pdf"));
        assert!(matches!(transcript[0].kind, MessageKind::FileReference { .. }));
        assert!(session.classifier.recorded_requests().is_empty());
        assert!(!session.handle.is_busy());
    }

    #[tokio::test]
    async fn test_attach_appointment_while_busy() {
        let session = TestSession::builder()
            .classifier(MockClassifier::gated())
            .build();
        session.classifier.queue(Classification::new(Severity::Medium, 0.5));

        session.handle.submit("rash").await.unwrap();
        session
            .handle
            .attach_appointment(AppointmentDetails {
                department: "Dermatology".to_string(),
                date: "2026-11-03".to_string(),
                time: "10:00".to_string(),
                patient_name: "Sipho N".to_string(),
                reason: "rash".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.handle.len(), 2);
        assert!(session.handle.is_busy());

        session.classifier.release();
        session.handle.wait_idle().await;

        let kinds: Vec<_> = session
            .handle
            .transcript()
            .into_iter()
            .map(|m| m.kind)
            .collect();
        assert!(matches!(kinds[1], MessageKind::AppointmentReference { .. }));
        assert!(matches!(kinds[2], MessageKind::PlainText));
    }

    #[tokio::test]
    async fn test_language_forwarded_only_when_enabled() {
        let session = TestSession::builder()
            .config(SessionConfig {
                greeting: None,
                send_language: true,
                language: "en".to_string(),
            })
            .build();
        session.classifier.queue(Classification::new(Severity::Low, 0.5));

        session.handle.set_language("xh").await.unwrap();
        session.handle.submit("intloko").await.unwrap();
        session.handle.wait_idle().await;
        assert_eq!(
            session.classifier.recorded_requests()[0].language.as_deref(),
            Some("xh")
        );

        let session = TestSession::builder().build();
        session.classifier.queue(Classification::new(Severity::Low, 0.5));
        session.handle.set_language("xh").await.unwrap();
        session.handle.submit("intloko").await.unwrap();
        session.handle.wait_idle().await;
        assert_eq!(session.classifier.recorded_requests()[0].language, None);
    }

    #[tokio::test]
    async fn test_result_after_unmount_is_discarded() {
        let mut session = TestSession::builder()
            .classifier(MockClassifier::gated())
            .build();
        session.classifier.queue(Classification::new(Severity::Low, 0.9));

        session.handle.submit("headache").await.unwrap();
        session.handle.unmount().await;
        assert!(!session.handle.is_mounted());

        session.classifier.release();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(session.handle.len(), 1);
        assert_eq!(
            session.handle.submit("again").await,
            Err(SessionError::Unmounted)
        );
    }

    #[tokio::test]
    async fn test_updates_stream() {
        let session = TestSession::builder().build();
        let mut updates = session.handle.subscribe();
        session.classifier.queue(Classification::new(Severity::High, 0.8));

        session.handle.submit("bleeding").await.unwrap();
        session.handle.wait_idle().await;

        let mut seen = Vec::new();
        while let Ok(update) = updates.try_recv() {
            seen.push(update);
        }

        assert!(matches!(
            seen.as_slice(),
            [
                SessionUpdate::MessageAppended { .. },
                SessionUpdate::BusyChanged { busy: true },
                SessionUpdate::MessageAppended { .. },
                SessionUpdate::BusyChanged { busy: false },
            ]
        ));
    }
}
