//! Nobody is perfect.
use std::borrow::Cow;

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, InvalidHeaderValue},
    StatusCode,
};
use strum::Display;
use thiserror::Error;

/// What went wrong, in broad strokes.
///
/// Every failed call is classified as exactly one of these. Match on it
/// to decide whether to retry, re-authenticate or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    /// Timeout, refused connection, DNS failure or any other transport fault.
    #[strum(serialize = "network error")]
    Network,

    /// `400 Bad Request`.
    #[strum(serialize = "validation error")]
    Validation,

    /// `401 Unauthorized`. Missing, invalid or expired token.
    #[strum(serialize = "authentication error")]
    Authentication,

    /// `403 Forbidden`.
    #[strum(serialize = "authorization error")]
    Authorization,

    /// `404 Not Found`.
    #[strum(serialize = "not found")]
    NotFound,

    /// Any `5xx` status.
    #[strum(serialize = "server error")]
    Server,

    /// Any other non-2xx status.
    #[strum(serialize = "api error")]
    GenericApi,

    /// The body was not the JSON the API is supposed to speak, either on
    /// the way out or on the way back.
    #[strum(serialize = "protocol error")]
    Protocol,
}

impl ErrorKind {
    /// Classify an HTTP status code. Successful (2xx) statuses yield `None`.
    ///
    /// ```
    /// use openlist::{ErrorKind, reqwest::StatusCode};
    ///
    /// assert_eq!(ErrorKind::from_status(StatusCode::OK), None);
    /// assert_eq!(ErrorKind::from_status(StatusCode::FORBIDDEN), Some(ErrorKind::Authorization));
    /// assert_eq!(ErrorKind::from_status(StatusCode::BAD_GATEWAY), Some(ErrorKind::Server));
    /// ```
    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }

        let kind = match status {
            StatusCode::BAD_REQUEST => Self::Validation,
            StatusCode::UNAUTHORIZED => Self::Authentication,
            StatusCode::FORBIDDEN => Self::Authorization,
            StatusCode::NOT_FOUND => Self::NotFound,
            s if s.is_server_error() => Self::Server,
            _ => Self::GenericApi,
        };

        Some(kind)
    }
}

/// Snapshot of the response that caused an [`Error`].
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Complete response body.
    pub body: Bytes,
}

impl RawResponse {
    /// The body as (lossy) UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Error used by the entire crate.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
    response: Option<RawResponse>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            response: None,
            source: None,
        }
    }

    /// Transport-level failure. The message is prefixed with what kind of
    /// fault occurred.
    pub(crate) fn network(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            format!("network error: {err}")
        };

        Self::new(ErrorKind::Network, message).with_source(err)
    }

    /// Classified failure carrying the offending response.
    pub(crate) fn api(kind: ErrorKind, message: impl Into<String>, response: RawResponse) -> Self {
        Self {
            status: Some(response.status),
            response: Some(response),
            ..Self::new(kind, message)
        }
    }

    pub(crate) fn with_response(mut self, response: RawResponse) -> Self {
        self.status = Some(response.status);
        self.response = Some(response);
        self
    }

    pub(crate) fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message, usually the `message` field of the error body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, if a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Numeric HTTP status, if a response was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status.map(|s| s.as_u16())
    }

    /// The response that caused this error, if any.
    #[must_use]
    pub fn raw_response(&self) -> Option<&RawResponse> {
        self.response.as_ref()
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::network(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Protocol, format!("json error: {err}")).with_source(err)
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(err: InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::Protocol, format!("invalid header value: {err}")).with_source(err)
    }
}
