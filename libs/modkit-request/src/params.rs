use crate::builder::TransportBuilder;
use crate::config::TransportConfig;
use crate::error::{BoxError, HttpError};
use crate::response::HttpResponse;
use crate::transport::Transport;
use http::Request;
use http::header::{COOKIE, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Header map used by parameter sets and header export.
///
/// Keys are stored as given; the last write for a key wins.
pub type Header = HashMap<String, String>;

/// Callback run after the response body has been drained.
///
/// Returning an error rejects the response: the error becomes the
/// response's [`HttpError::Hook`] and later hooks are skipped.
pub type ResponseHook = Arc<dyn Fn(&HttpResponse) -> Result<(), BoxError> + Send + Sync>;

/// Bag of request configuration: headers, cookie, transport override and
/// response hooks.
///
/// A client holds one long-lived *default* set; each [`RequestBuilder`]
/// owns a fresh *per-call* set. Once a set is shared through an `Arc` it is
/// never mutated again, so concurrent requests can read it freely.
///
/// # Example
///
/// ```ignore
/// let defaults = ParameterSet::new()
///     .header("x-tenant", "acme")
///     .cookie("session=abc")
///     .response_hook(|resp| match resp.status() {
///         Some(status) if status.is_success() => Ok(()),
///         other => Err(format!("unexpected status {other:?}").into()),
///     });
/// ```
///
/// [`RequestBuilder`]: crate::RequestBuilder
#[derive(Clone, Default)]
pub struct ParameterSet {
    header: Header,
    cookie: String,
    response_hooks: Vec<ResponseHook>,
    transport: Option<Transport>,
}

impl ParameterSet {
    /// Create an empty parameter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one header entry. No validation happens here;
    /// invalid names or values are reported when the request is built.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Apply [`header`](Self::header) for every entry, in iteration order.
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self = self.header(name, value);
        }
        self
    }

    /// Store the cookie string sent with every request, replacing any
    /// previous value. An empty string means no cookie.
    #[must_use]
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = cookie.into();
        self
    }

    /// Replace the transport override with a new transport that routes all
    /// traffic through `proxy`.
    ///
    /// Any previously configured override is discarded, including its
    /// settings; the new transport uses [`TransportConfig::proxied`].
    ///
    /// # Errors
    /// Returns `HttpError::InvalidProxy` for unsupported proxy URLs and
    /// `HttpError::Tls` if TLS initialization fails.
    pub fn proxy(mut self, proxy: &Url) -> Result<Self, HttpError> {
        let config = TransportConfig::proxied(proxy.clone());
        self.transport = Some(TransportBuilder::with_config(config).build()?);
        Ok(self)
    }

    /// Use `transport` instead of the shared one for requests using this set.
    #[must_use]
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Append a response hook. Hooks run in registration order.
    #[must_use]
    pub fn response_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HttpResponse) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.response_hooks.push(Arc::new(hook));
        self
    }

    /// Configured headers
    #[must_use]
    pub fn header_map(&self) -> &Header {
        &self.header
    }

    /// Configured cookie string (empty when unset)
    #[must_use]
    pub fn cookie_value(&self) -> &str {
        &self.cookie
    }

    /// Configured response hooks
    #[must_use]
    pub fn response_hooks(&self) -> &[ResponseHook] {
        &self.response_hooks
    }

    /// Configured transport override
    #[must_use]
    pub fn transport_override(&self) -> Option<&Transport> {
        self.transport.as_ref()
    }

    /// Write this set's headers and cookie into `request`.
    ///
    /// Every header replaces any same-named header already on the request.
    /// A non-empty cookie then replaces the `cookie` header, including one
    /// set through the header map.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderName` / `HttpError::InvalidHeaderValue`
    /// when an entry is not a valid HTTP header. The request may already be
    /// partially updated at that point.
    pub fn apply_to<B>(&self, request: &mut Request<B>) -> Result<(), HttpError> {
        let headers = request.headers_mut();
        for (name, value) in &self.header {
            headers.insert(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }
        if !self.cookie.is_empty() {
            headers.insert(COOKIE, HeaderValue::try_from(self.cookie.as_str())?);
        }
        Ok(())
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSet")
            .field("header", &self.header)
            .field("cookie", &self.cookie)
            .field("response_hooks", &self.response_hooks.len())
            .field("transport", &self.transport)
            .finish()
    }
}
