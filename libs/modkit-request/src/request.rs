use crate::body::Body;
use crate::builder::TransportBuilder;
use crate::config::{MergePolicy, TransportConfig};
use crate::error::{BoxError, HttpError, InvalidUriKind};
use crate::params::ParameterSet;
use crate::response::{HttpResponse, read_body};
use crate::transport::{RequestBody, Transport};
use http::{Method, Request, Response, Uri};
use std::sync::Arc;
use tracing::Instrument;
use url::Url;

const JSON_HEADERS: [(&str, &str); 2] = [
    ("content-type", "application/json; charset=utf-8"),
    ("Accept", "application/json"),
];

/// One-shot fluent request builder.
///
/// Holds a shared, read-only *default* [`ParameterSet`] and its own
/// *per-call* set. Setters configure the per-call set; [`request`] consumes
/// the builder, so a builder can never issue a second request.
///
/// # Example
///
/// ```ignore
/// let mut resp = client
///     .new_request()
///     .header("x-request-id", "abc123")
///     .cookie("session=s1")
///     .response_hook(|r| match r.status() {
///         Some(status) if status.is_success() => Ok(()),
///         other => Err(format!("unexpected status {other:?}").into()),
///     })
///     .json_request("post", "https://api.example.com/items", Body::json(&item))
///     .await;
///
/// let mut created = Item::default();
/// resp.decode_json(&mut created);
/// if let Some(err) = resp.error() {
///     return Err(err.to_string());
/// }
/// ```
///
/// [`request`]: RequestBuilder::request
#[derive(Debug)]
#[must_use = "RequestBuilder does nothing until .request() is called"]
pub struct RequestBuilder {
    defaults: Arc<ParameterSet>,
    params: ParameterSet,
    merge_policy: MergePolicy,
    /// Error captured during building (deferred to `request()`)
    error: Option<HttpError>,
}

impl RequestBuilder {
    /// Create a builder over a shared default parameter set
    pub fn new(defaults: Arc<ParameterSet>) -> Self {
        Self {
            defaults,
            params: ParameterSet::new(),
            merge_policy: MergePolicy::default(),
            error: None,
        }
    }

    /// Choose how default and per-call settings are combined
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Set one per-call header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params = self.params.header(name, value);
        self
    }

    /// Set several per-call headers
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params = self.params.headers(headers);
        self
    }

    /// Set the per-call cookie string
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.params = self.params.cookie(cookie);
        self
    }

    /// Send this request through an `http://`, `socks5://` or `socks5h://` proxy.
    ///
    /// Replaces any per-call transport. If the proxy URL is unusable the
    /// error is reported by [`request`](Self::request) without any I/O.
    pub fn proxy(mut self, proxy: &Url) -> Self {
        match TransportBuilder::with_config(TransportConfig::proxied(proxy.clone())).build() {
            Ok(transport) => self.params = self.params.transport(transport),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    /// Use `transport` for this request
    pub fn transport(mut self, transport: Transport) -> Self {
        self.params = self.params.transport(transport);
        self
    }

    /// Add a per-call response hook.
    ///
    /// Once any per-call hook is registered, the default set's hooks are not
    /// run for this request.
    pub fn response_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HttpResponse) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.params = self.params.response_hook(hook);
        self
    }

    /// Send a JSON request: sets `content-type: application/json; charset=utf-8`
    /// and `Accept: application/json` on the per-call set, then behaves like
    /// [`request`](Self::request).
    pub async fn json_request(self, method: &str, url: &str, body: impl Into<Body>) -> HttpResponse {
        self.headers(JSON_HEADERS).request(method, url, body).await
    }

    /// Execute the request.
    ///
    /// Runs body encoding, request construction, configuration merge,
    /// transport selection, the round trip, body drain and the response hooks,
    /// stopping at the first failure. The outcome, including any error, is
    /// always returned as an [`HttpResponse`]; check
    /// [`HttpResponse::error`] before using the body.
    pub async fn request(self, method: &str, url: &str, body: impl Into<Body>) -> HttpResponse {
        let span = tracing::debug_span!("http_request", method = %method, url = %url);
        self.run(method, url, body.into()).instrument(span).await
    }

    async fn run(self, method: &str, url: &str, body: Body) -> HttpResponse {
        let Self {
            defaults,
            params,
            merge_policy,
            error,
        } = self;

        if let Some(err) = error {
            tracing::debug!(error = %err, "request rejected before construction");
            return HttpResponse::fail(err);
        }

        let request = match build_request(method, url, body, &defaults, &params, merge_policy) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, stage = ?err.stage(), "request not sent");
                return HttpResponse::fail(err);
            }
        };

        let mut resp = HttpResponse::new();
        resp.set_request(head_of(&request));

        let transport = match select_transport(&defaults, &params, merge_policy) {
            Ok(transport) => transport,
            Err(err) => {
                tracing::warn!(error = %err, "no transport available");
                resp.set_error(err);
                return resp;
            }
        };

        tracing::debug!(policy = ?merge_policy, "sending request");
        let response = match transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "request failed");
                resp.set_error(err);
                return resp;
            }
        };

        let (parts, body) = response.into_parts();
        resp.set_response(Response::from_parts(parts, ()));
        // The body is consumed here; nothing of the stream outlives the drain.
        match read_body(body).await {
            Ok(data) => {
                tracing::debug!(
                    status = ?resp.status(),
                    bytes = data.len(),
                    "response received"
                );
                resp.set_data(data);
            }
            Err(err) => {
                tracing::warn!(error = %err, status = ?resp.status(), "response body read failed");
                resp.set_error(err);
                return resp;
            }
        }

        let hooks = if params.response_hooks().is_empty() {
            defaults.response_hooks()
        } else {
            params.response_hooks()
        };
        for (index, hook) in hooks.iter().enumerate() {
            if let Err(err) = hook(&resp) {
                tracing::debug!(hook = index, error = %err, "response hook rejected response");
                resp.set_error(HttpError::Hook(err));
                break;
            }
        }

        resp
    }
}

/// Encode the body, then build and configure the outgoing request.
fn build_request(
    method: &str,
    url: &str,
    body: Body,
    defaults: &ParameterSet,
    params: &ParameterSet,
    merge_policy: MergePolicy,
) -> Result<Request<RequestBody>, HttpError> {
    let body = body.encode()?;
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
    let uri = validate_url(url)?;

    let mut request = Request::builder().method(method).uri(uri).body(body)?;
    defaults.apply_to(&mut request)?;
    if merge_policy == MergePolicy::Layered {
        params.apply_to(&mut request)?;
    }
    Ok(request)
}

/// Pick the transport for this request according to the merge policy.
fn select_transport(
    defaults: &ParameterSet,
    params: &ParameterSet,
    merge_policy: MergePolicy,
) -> Result<Transport, HttpError> {
    let chosen = match merge_policy {
        MergePolicy::Layered => params
            .transport_override()
            .or_else(|| defaults.transport_override()),
        MergePolicy::DefaultsOnly => defaults.transport_override(),
    };
    match chosen {
        Some(transport) => Ok(transport.clone()),
        None => Transport::shared(),
    }
}

/// Parse `url` and require an absolute `http` or `https` URL.
fn validate_url(url: &str) -> Result<Uri, HttpError> {
    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::ParseError,
            reason: e.to_string(),
        })?;

    if uri.authority().is_none() {
        return Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingAuthority,
            reason: "missing host/authority".to_owned(),
        });
    }

    match uri.scheme_str() {
        Some("http" | "https") => Ok(uri),
        Some(scheme) => Err(HttpError::InvalidScheme {
            scheme: scheme.to_owned(),
            reason: "only http:// and https:// schemes are supported".to_owned(),
        }),
        None => Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingScheme,
            reason: "missing scheme".to_owned(),
        }),
    }
}

/// Copy of the request head, kept on the response for inspection.
fn head_of<B>(request: &Request<B>) -> Request<()> {
    let mut head = Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    head
}
