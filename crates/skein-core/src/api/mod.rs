//! Remote thread service interface.
//!
//! The engine never talks HTTP directly; it goes through the
//! [`ThreadSource`] seam. [`ServiceClient`] is the production
//! implementation against the companion backend.

mod client;

use std::fmt;

pub use client::ServiceClient;

use crate::thread::document::ThreadDocument;

/// Error categories for service failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-success HTTP status without a service-level error body.
    HttpStatus,
    /// Connection or request timeout.
    Timeout,
    /// Transport-level failure (DNS, refused connection, TLS).
    Network,
    /// Response body could not be decoded.
    Parse,
    /// Service-level error reported in the response body.
    Service,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Service => write!(f, "service"),
        }
    }
}

/// Service failure with a message fit for the inline error block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error category.
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
    /// Optional additional details (e.g., raw error body).
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Thread content source.
///
/// Asynchronous; fails with an error carrying a human-readable message. No
/// pagination or partial-result contract is assumed.
pub trait ThreadSource {
    /// Fetches the thread document for `uri`.
    fn fetch_thread(
        &self,
        uri: &str,
    ) -> impl Future<Output = Result<ThreadDocument, ApiError>> + Send;
}
