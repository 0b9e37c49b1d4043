use crate::batch::BatchRequest;
use crate::transport::TransportError;
use thiserror::Error;

/// Distinguishes authentication failures from other service-reported errors.
///
/// OAuth errors are a refinement of service errors, not a separate code path:
/// both carry the same message/code payload and flow through the same parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorKind {
    /// The service reported a logical error (structured or legacy shape).
    Service,
    /// The service reported an `OAuthException`.
    Oauth,
}

/// An error reported by the Graph API in its response payload.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}{}", format_code(.code))]
pub struct GraphError {
    pub message: String,
    pub code: Option<i64>,
    pub kind: GraphErrorKind,
    /// The batch entry that produced this error, when it came out of a
    /// batch call. Lets consumers correlate per-entry failures.
    pub request: Option<BatchRequest>,
}

fn format_code(code: &Option<i64>) -> String {
    match code {
        Some(code) => format!(" (code {})", code),
        None => String::new(),
    }
}

impl GraphError {
    pub fn service(message: impl Into<String>, code: Option<i64>) -> Self {
        Self {
            message: message.into(),
            code,
            kind: GraphErrorKind::Service,
            request: None,
        }
    }

    pub fn oauth(message: impl Into<String>, code: Option<i64>) -> Self {
        Self {
            message: message.into(),
            code,
            kind: GraphErrorKind::Oauth,
            request: None,
        }
    }

    pub fn is_oauth(&self) -> bool {
        self.kind == GraphErrorKind::Oauth
    }

    pub(crate) fn with_request(mut self, request: BatchRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// Unified error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure: connection, DNS, timeout. Never a raw
    /// transport-library error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service reported an error in its payload, or an operation hit
    /// the bare-`false` denial convention.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A caller-supplied argument was outside the accepted set. No network
    /// call was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON encoding failed (batch request bodies).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Signed request envelope could not be parsed or verified.
    #[error(transparent)]
    SignedRequest(#[from] crate::signed_request::SignedRequestError),
}

impl Error {
    /// True when this is a service-reported authentication failure.
    pub fn is_oauth(&self) -> bool {
        matches!(self, Error::Graph(e) if e.is_oauth())
    }
}
