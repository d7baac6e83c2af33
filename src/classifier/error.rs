//! Classifier error types

use thiserror::Error;

/// Classifier error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClassifyError {
    pub kind: ClassifyErrorKind,
    pub message: String,
    /// HTTP status, when the service answered with a non-2xx code
    pub status: Option<u16>,
}

impl ClassifyError {
    pub fn new(kind: ClassifyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClassifyErrorKind::Network, message)
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ClassifyErrorKind::HttpStatus, message)
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ClassifyErrorKind::MalformedResponse, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ClassifyErrorKind::Internal, message)
    }
}

/// Error classification
///
/// The session treats every kind the same way; the distinction exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyErrorKind {
    /// Connection refused, DNS failure, reset mid-body
    Network,
    /// Service answered with a non-2xx status
    HttpStatus,
    /// Body was not the expected JSON shape
    MalformedResponse,
    /// The classifier itself panicked or was aborted
    Internal,
}

impl ClassifyErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus => "http_status",
            Self::MalformedResponse => "malformed_response",
            Self::Internal => "internal",
        }
    }

    /// Transport-level failures, as opposed to a bad answer from a reachable service
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Network | Self::HttpStatus)
    }
}
