//! The transport every API group goes through.
//!
//! [`Client`] owns the base url, the timeout and the credential, turns a
//! method, a path and some [`RequestOptions`] into a request, and turns
//! the response into either parsed JSON or a classified [`Error`].
use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    multipart::Form,
    Body, Method,
};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    api::{parse_json, read_body},
    errors::{Error, ErrorKind, RawResponse},
};

/// `User-Agent` used in all requests.
pub static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a request.
#[derive(Debug, Default)]
enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Raw(Body),
    Multipart(Form),
}

/// Everything about a request except its method and path.
///
/// ```
/// use openlist::client::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .query("id", 3)
///     .json(&json!({ "path": "/" }))
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub(crate) query: Vec<(String, String)>,
    body: RequestBody,
    headers: HeaderMap,
}

impl RequestOptions {
    /// No query, no body, no extra headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Send `body` as JSON.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Protocol`] if `body` can't be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> crate::Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Send a raw body. Remember to override `Content-Type`.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = RequestBody::Raw(body.into());
        self
    }

    /// Send a `multipart/form-data` body. The default `Content-Type` is
    /// left out in favour of the one carrying the boundary.
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Set a header, replacing the default of the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Session with a server.
///
/// Cloning is cheap; clones share the connection pool *and* the
/// credential, so a token set through one clone is used by all of them.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    credential: Arc<RwLock<Option<String>>>,
}

impl Client {
    /// Create a new session. Trailing slashes in `base_url` are removed.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Network`] if the HTTP client (TLS backend, most
    /// likely) cannot be initialized.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> crate::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.as_ref().trim_end_matches('/').to_owned(),
            timeout,
            credential: Arc::default(),
        })
    }

    /// Base url, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout applied to every request.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replace the credential sent in the `Authorization` header.
    pub fn set_credential(&self, token: impl Into<String>) {
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Stop sending an `Authorization` header.
    pub fn clear_credential(&self) {
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The current credential, if any.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Default headers, then the caller's, then the credential.
    fn headers(&self, options: &RequestOptions) -> crate::Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if !matches!(options.body, RequestBody::Multipart(_)) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        for (name, value) in &options.headers {
            headers.insert(name, value.clone());
        }

        if let Some(token) = self.credential() {
            let mut value = HeaderValue::try_from(token).map_err(|e| {
                Error::new(ErrorKind::Protocol, "credential is not a valid header value")
                    .with_source(e)
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> crate::Result<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        let headers = self.headers(&options)?;

        let mut req = self.http.request(method, url).headers(headers);

        if !options.query.is_empty() {
            req = req.query(&options.query);
        }

        req = match options.body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.body(serde_json::to_vec(&value)?),
            RequestBody::Raw(body) => req.body(body),
            RequestBody::Multipart(form) => req.multipart(form),
        };

        let res = req.send().await?;

        read_body(res).await
    }

    /// Perform a request and parse the response body as JSON.
    ///
    /// # Errors
    ///
    /// Every failure is classified, see [`ErrorKind`]:
    ///
    /// - network errors (including timeouts)
    /// - any non-2xx status
    /// - a 2xx body that isn't JSON
    #[instrument(level = "trace", skip(self, options), fields(base_url = %self.base_url))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> crate::Result<Value> {
        let raw = self.send(method, path, options).await?;

        parse_json(raw)
    }

    /// Like [`Client::request`], but return the body as text. For the
    /// handful of endpoints that don't speak JSON.
    ///
    /// # Errors
    ///
    /// - network errors (including timeouts)
    /// - any non-2xx status
    #[instrument(level = "trace", skip(self, options), fields(base_url = %self.base_url))]
    pub async fn request_text(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> crate::Result<String> {
        let raw = self.send(method, path, options).await?;

        Ok(raw.text().into_owned())
    }

    /// `GET` request. See [`Client::request`].
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get(&self, path: &str, options: RequestOptions) -> crate::Result<Value> {
        self.request(Method::GET, path, options).await
    }

    /// `POST` request. See [`Client::request`].
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post(&self, path: &str, options: RequestOptions) -> crate::Result<Value> {
        self.request(Method::POST, path, options).await
    }

    /// `PUT` request. See [`Client::request`].
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put(&self, path: &str, options: RequestOptions) -> crate::Result<Value> {
        self.request(Method::PUT, path, options).await
    }

    /// `DELETE` request. See [`Client::request`].
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(&self, path: &str, options: RequestOptions) -> crate::Result<Value> {
        self.request(Method::DELETE, path, options).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{
        header::{self, HeaderValue},
        multipart::Form,
    };
    use serde_json::json;

    use super::{Client, RequestOptions};

    fn client() -> Client {
        Client::new("http://localhost:5244", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let client = Client::new("http://localhost:5244///", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5244");
    }

    #[test]
    fn default_headers() {
        let headers = client().headers(&RequestOptions::new()).unwrap();

        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(!headers.contains_key(header::AUTHORIZATION));
    }

    #[test]
    fn credential_is_sent_verbatim() {
        let client = client();
        client.set_credential("eyJhbGciOiJIUzI1NiJ9.e30.sig");

        let headers = client.headers(&RequestOptions::new()).unwrap();
        let auth = &headers[header::AUTHORIZATION];

        assert_eq!(auth, "eyJhbGciOiJIUzI1NiJ9.e30.sig");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn credential_is_shared_between_clones() {
        let a = client();
        let b = a.clone();

        a.set_credential("token");
        assert_eq!(b.credential().as_deref(), Some("token"));

        b.clear_credential();
        assert_eq!(a.credential(), None);
    }

    #[test]
    fn caller_headers_override_defaults() {
        let options = RequestOptions::new().header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

        let headers = client().headers(&options).unwrap();

        assert_eq!(headers[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn multipart_has_no_default_content_type() {
        let options = RequestOptions::new().multipart(Form::new().text("a", "b"));

        let headers = client().headers(&options).unwrap();

        assert!(!headers.contains_key(header::CONTENT_TYPE));
    }

    #[test]
    fn invalid_credential_is_a_protocol_error() {
        let client = client();
        client.set_credential("line\nbreak");

        let err = client.headers(&RequestOptions::new()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Protocol);
    }

    #[test]
    fn options_collect_query_and_json() {
        let options = RequestOptions::new()
            .query("id", 7)
            .query("tid", "abc")
            .json(&json!({ "path": "/x" }))
            .unwrap();

        assert_eq!(
            options.query,
            vec![
                ("id".to_owned(), "7".to_owned()),
                ("tid".to_owned(), "abc".to_owned())
            ]
        );
        assert!(matches!(options.body, super::RequestBody::Json(ref v) if v["path"] == "/x"));
    }
}
