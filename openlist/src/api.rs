//! The response envelope and everything needed to turn an HTTP response
//! into either JSON or a classified [`Error`].
use reqwest::Response as HttpResponse;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::errors::{Error, ErrorKind, RawResponse};

/// The envelope wrapped around every JSON response.
///
/// The transport never looks at `code` or `message`; they are passed
/// through for the caller to inspect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    /// Application-level status code. `200` on success.
    pub code: i64,
    /// Application-level message, often `"success"`.
    pub message: String,
    /// Payload.
    pub data: T,
}

impl<T> Response<T> {
    /// Whether the envelope reports success (`code == 200`).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == 200
    }

    /// Discard the envelope.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Transform the payload, keeping the envelope.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            code: self.code,
            message: self.message,
            data: f(self.data),
        }
    }
}

/// A response whose `data` carries nothing of interest (often `null`).
pub type BaseResponse = Response<Value>;

/// A page of results, as returned by most listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page. The server sends `null` rather than `[]` when empty.
    #[serde(default, deserialize_with = "crate::serde::null_as_default")]
    pub content: Vec<T>,
    /// Total number of items, on all pages.
    pub total: u64,
}

/// Creation payloads carry an explicit `id` of zero.
#[derive(Debug, Serialize)]
pub(crate) struct WithId<'a, T> {
    pub(crate) id: u64,
    #[serde(flatten)]
    pub(crate) inner: &'a T,
}

/// A JSON error body. Only `message` is of interest.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Read the whole response and classify it by status.
///
/// Non-2xx responses become an [`Error`] whose message is taken from the
/// body's `message` field, or the generic status text if there is none.
///
/// # Errors
///
/// - network errors while reading the body
/// - any non-2xx status
pub(crate) async fn read_body(res: HttpResponse) -> crate::Result<RawResponse> {
    let status = res.status();
    let status_err = res.error_for_status_ref().err();
    let headers = res.headers().clone();
    let body = res.bytes().await?;

    trace!(%status, len = body.len(), "received response");

    let raw = RawResponse {
        status,
        headers,
        body,
    };

    let Some(kind) = ErrorKind::from_status(status) else {
        return Ok(raw);
    };

    let message = error_message(&raw.body).unwrap_or_else(|| match &status_err {
        Some(err) => err.to_string(),
        None => status.to_string(),
    });

    debug!(%status, %kind, %message, "request failed");

    let err = Error::api(kind, message, raw);

    Err(match status_err {
        Some(source) => err.with_source(source),
        None => err,
    })
}

fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body).ok()?.message
}

/// Parse a successful body as JSON.
///
/// # Errors
///
/// Returns a [`ErrorKind::Protocol`] error, with the response attached, if
/// the body isn't valid JSON.
pub(crate) fn parse_json(raw: RawResponse) -> crate::Result<Value> {
    match serde_json::from_slice(&raw.body) {
        Ok(value) => Ok(value),
        Err(err) => Err(Error::new(
            ErrorKind::Protocol,
            format!("invalid JSON in response body: {err}"),
        )
        .with_source(err)
        .with_response(raw)),
    }
}

/// Decode the envelope and its payload.
///
/// # Errors
///
/// Returns a [`ErrorKind::Protocol`] error if the JSON doesn't have the
/// expected shape.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> crate::Result<Response<T>> {
    serde_json::from_value(value).map_err(Into::into)
}
