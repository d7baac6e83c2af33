//! HTTP-backed classifier talking to the `/predict` endpoint

use super::types::{Classification, ClassifyRequest, PredictRequest, PredictResponse, Severity};
use super::{ClassifyError, Classifier};
use async_trait::async_trait;
use reqwest::Client;

/// Classifier backed by the external prediction service
///
/// One POST per call. No retries and no request timeout: the call waits for
/// the transport to resolve or fail.
pub struct HttpClassifier {
    client: Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/predict", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse a 2xx body into a classification
    ///
    /// Deliberately stricter than a client that only formats the number for
    /// display: a confidence outside `[0, 1]` (or non-numeric) is a malformed
    /// response and the user gets the fallback reply instead of a nonsense
    /// percentage.
    fn parse_body(body: &str) -> Result<Classification, ClassifyError> {
        let response: PredictResponse = serde_json::from_str(body).map_err(|e| {
            ClassifyError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        if !(0.0..=1.0).contains(&response.confidence) {
            return Err(ClassifyError::malformed(format!(
                "Confidence out of range: {}",
                response.confidence
            )));
        }

        Ok(Classification::new(
            Severity::parse(&response.predicted_severity),
            response.confidence,
        ))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Classification, ClassifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest::from(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ClassifyError::network(format!("Connection failed: {e}"))
                } else {
                    ClassifyError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassifyError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ClassifyError::http_status(
                status.as_u16(),
                format!("Prediction service returned {status}: {body}"),
            ));
        }

        Self::parse_body(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}
