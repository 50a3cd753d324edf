use crate::error::HttpError;
use crate::params::Header;
use crate::query::PathValue;
use crate::transport::ResponseBody;
use bytes::Bytes;
use cookie::Cookie;
use http::header::SET_COOKIE;
use http::{HeaderMap, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Outcome of one request: the sticky error, the request and response
/// heads, and the fully drained body.
///
/// A wrapper is always returned, even when the request failed before any
/// I/O. Check [`error`](Self::error) (or use [`into_result`](Self::into_result))
/// before trusting the other accessors.
///
/// The connection-level body is consumed and released before the wrapper
/// is handed out; only the buffered bytes remain.
///
/// # Example
///
/// ```ignore
/// let mut resp = client.new_request().request("GET", url, ()).await;
/// let mut user = User::default();
/// resp.decode_json(&mut user);
/// if let Some(err) = resp.error() {
///     tracing::warn!(error = %err, "lookup failed");
/// }
/// let id = resp.query_path("$.data.id").as_i64();
/// ```
#[derive(Debug, Default)]
pub struct HttpResponse {
    error: Option<HttpError>,
    request: Option<Request<()>>,
    response: Option<Response<()>>,
    data: Bytes,
}

impl HttpResponse {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(error: HttpError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub(crate) fn set_error(&mut self, error: HttpError) {
        self.error = Some(error);
    }

    pub(crate) fn set_request(&mut self, request: Request<()>) {
        self.request = Some(request);
    }

    pub(crate) fn set_response(&mut self, response: Response<()>) {
        self.response = Some(response);
    }

    pub(crate) fn set_data(&mut self, data: Bytes) {
        self.data = data;
    }

    /// First error recorded for this request, if any
    #[must_use]
    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    /// `true` when no error has been recorded
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Turn the sticky error into a `Result`.
    ///
    /// # Errors
    /// Returns the recorded error, if any.
    pub fn into_result(self) -> Result<Self, HttpError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Response status, when a response was received
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(Response::status)
    }

    /// Response headers, when a response was received
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.response.as_ref().map(Response::headers)
    }

    /// Response head (status, version, headers), when a response was received
    #[must_use]
    pub fn raw_response(&self) -> Option<&Response<()>> {
        self.response.as_ref()
    }

    /// Request head as it was sent, once the request was constructed
    #[must_use]
    pub fn raw_request(&self) -> Option<&Request<()>> {
        self.request.as_ref()
    }

    /// Decode the buffered body as JSON into `target`.
    ///
    /// Does nothing if an error is already recorded. On a decode failure the
    /// error is recorded as `HttpError::Decode` and `target` is left as it was.
    /// Returns `self` for chaining.
    pub fn decode_json<T: DeserializeOwned>(&mut self, target: &mut T) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::from_slice(&self.data) {
            Ok(value) => *target = value,
            Err(err) => {
                tracing::debug!(error = %err, "response body is not valid JSON for target");
                self.error = Some(HttpError::Decode(err));
            }
        }
        self
    }

    /// Evaluate a JSONPath expression against the buffered body.
    ///
    /// Never fails: on an empty or non-JSON body, or an invalid path, the
    /// result is "not found". The sticky error is ignored.
    #[must_use]
    pub fn query_path(&self, path: &str) -> PathValue {
        PathValue::query(&self.data, path)
    }

    /// Buffered body bytes (empty if no body was read)
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Buffered body as text; invalid UTF-8 is replaced
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Copy response headers into a [`Header`] map.
    ///
    /// With no `names`, every response header is exported under its
    /// lowercase name, multiple values joined with `;`. Otherwise each name
    /// maps to the first value of that header (looked up case-insensitively),
    /// or an empty string when it is absent.
    #[must_use]
    pub fn export_header(&self, names: &[&str]) -> Header {
        let mut exported = Header::new();
        let Some(headers) = self.headers() else {
            return exported;
        };

        if names.is_empty() {
            for name in headers.keys() {
                let joined = headers
                    .get_all(name)
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_bytes()))
                    .collect::<Vec<_>>()
                    .join(";");
                exported.insert(name.as_str().to_owned(), joined);
            }
        } else {
            for &name in names {
                let value = headers
                    .get(name)
                    .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                    .unwrap_or_default();
                exported.insert(name.to_owned(), value);
            }
        }
        exported
    }

    /// Render the response's `Set-Cookie` cookies as `name=value` pairs
    /// joined with `;`.
    ///
    /// A cookie is included when its value, quotes stripped, is non-empty.
    /// Otherwise it is included only when `names` is empty or its name
    /// matches one of `names` case-insensitively.
    /// Unparseable `Set-Cookie` headers are skipped.
    #[must_use]
    pub fn export_cookie(&self, names: &[&str]) -> String {
        let Some(headers) = self.headers() else {
            return String::new();
        };

        headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| match Cookie::parse(raw) {
                Ok(cookie) => Some(cookie),
                Err(err) => {
                    tracing::trace!(error = %err, "skipping malformed Set-Cookie header");
                    None
                }
            })
            .filter(|cookie| {
                !cookie.value_trimmed().is_empty()
                    || names.is_empty()
                    || names.iter().any(|n| n.eq_ignore_ascii_case(cookie.name()))
            })
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value_trimmed()))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Drain a response body into memory.
///
/// The body is consumed frame by frame and dropped before returning, which
/// hands the connection back to the pool.
///
/// # Errors
/// Returns `HttpError::BodyRead` if the stream fails before its end.
pub async fn read_body(body: ResponseBody) -> Result<Bytes, HttpError> {
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::BodyRead)?;
        if let Some(chunk) = frame.data_ref() {
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
