use thiserror::Error;

/// Boxed error used for transport, body and hook failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of URL validation failures.
///
/// Provides programmatic matching for different failure modes without
/// relying on unstable error message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// URL could not be parsed (malformed syntax)
    ParseError,
    /// URL is missing required host/authority component
    MissingAuthority,
    /// URL is missing required scheme (http/https)
    MissingScheme,
}

/// Request builder error types
///
/// Every failure of a request is reported through [`HttpResponse::error`]
/// as one of these variants. The stage that produced it can be recovered with
/// [`HttpError::stage`].
///
/// [`HttpResponse::error`]: crate::HttpResponse::error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    /// Request body could not be serialized to JSON
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// HTTP method token is not valid
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] http::method::InvalidMethod),

    /// Invalid header name
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Invalid URL (failed to parse)
    ///
    /// Use the `kind` field for programmatic matching. The `reason` field contains
    /// a diagnostic message intended for logging only.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        /// The URL that failed to parse
        url: String,
        /// Structured failure classification for programmatic matching
        kind: InvalidUriKind,
        /// Diagnostic message (unstable format, for logging only)
        reason: String,
    },

    /// URL scheme is not supported by the transport
    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme {
        /// The URL scheme that was rejected
        scheme: String,
        /// Reason the scheme was rejected
        reason: String,
    },

    /// Proxy URL cannot be used to build a transport
    #[error("Invalid proxy '{url}': {reason}")]
    InvalidProxy {
        /// The proxy URL that was rejected
        url: String,
        /// Reason the proxy was rejected
        reason: String,
    },

    /// Transport error (network, connection, DNS, etc)
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// TLS error
    #[error("TLS error: {0}")]
    Tls(#[source] BoxError),

    /// Response arrived but its body could not be read to the end
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] BoxError),

    /// A response hook rejected the response
    #[error("Response hook failed: {0}")]
    Hook(#[source] BoxError),

    /// Response body is not valid JSON for the requested type
    #[error("JSON decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Stage of a request at which an [`HttpError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStage {
    /// Body serialization, before any request existed
    Encoding,
    /// Method, URL, header or proxy validation, before any I/O
    RequestConstruction,
    /// Network round trip
    Transport,
    /// Draining the response body
    BodyRead,
    /// Response hook chain
    Hook,
    /// Caller-requested JSON decoding
    Decode,
}

impl HttpError {
    /// Stage of the request pipeline this error belongs to.
    #[must_use]
    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::Encode(_) => ErrorStage::Encoding,
            Self::RequestBuild(_)
            | Self::InvalidMethod(_)
            | Self::InvalidHeaderName(_)
            | Self::InvalidHeaderValue(_)
            | Self::InvalidUri { .. }
            | Self::InvalidScheme { .. }
            | Self::InvalidProxy { .. } => ErrorStage::RequestConstruction,
            Self::Transport(_) | Self::Tls(_) => ErrorStage::Transport,
            Self::BodyRead(_) => ErrorStage::BodyRead,
            Self::Hook(_) => ErrorStage::Hook,
            Self::Decode(_) => ErrorStage::Decode,
        }
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        HttpError::Transport(Box::new(err))
    }
}
