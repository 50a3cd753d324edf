use crate::builder::TransportBuilder;
use crate::error::{BoxError, HttpError};
use bytes::Bytes;
use http::{Request, Response};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceExt};

/// Type-erased request body handed to the transport.
pub type RequestBody = http_body_util::combinators::BoxBody<Bytes, BoxError>;

/// Type-erased response body produced by the transport.
///
/// For the default stack this is the body after the decompression layer,
/// so it yields decoded bytes when the server sent gzip/br/deflate.
pub type ResponseBody = http_body_util::combinators::BoxBody<Bytes, BoxError>;

/// Future returned by [`Transport::execute`]
pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

type TransportService = BoxCloneSyncService<Request<RequestBody>, Response<ResponseBody>, HttpError>;

/// Process-wide transport used when no override is configured.
///
/// Built once on first use and never reset. A build failure is remembered
/// as its message so later calls report the same error without retrying.
static SHARED_TRANSPORT: OnceLock<Result<Transport, String>> = OnceLock::new();

#[cfg(test)]
static SHARED_BUILD_COUNT: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Network execution capability used by a request.
///
/// A `Transport` is a cheaply clonable handle over a tower service
/// `Request<RequestBody> -> Response<ResponseBody>`. The default one is a
/// pooled hyper client built by [`TransportBuilder`]; tests and callers with
/// special needs can plug in any service via [`Transport::from_service`].
///
/// # Thread Safety
///
/// `Transport` is `Clone + Send + Sync`. Each call clones the service handle,
/// so concurrent requests never serialize on a lock.
#[derive(Clone)]
pub struct Transport {
    service: TransportService,
}

impl Transport {
    /// Build a transport with default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        TransportBuilder::new().build()
    }

    /// Create a builder for configuring a transport
    #[must_use]
    pub fn builder() -> TransportBuilder {
        TransportBuilder::new()
    }

    /// Wrap an arbitrary tower service as a transport.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let transport = Transport::from_service(tower::service_fn(|req| async move {
    ///     Ok::<_, HttpError>(http::Response::new(empty_body()))
    /// }));
    /// ```
    #[must_use]
    pub fn from_service<S>(service: S) -> Self
    where
        S: Service<Request<RequestBody>, Response = Response<ResponseBody>, Error = HttpError>
            + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        Self {
            service: BoxCloneSyncService::new(service),
        }
    }

    /// The shared process-wide transport.
    ///
    /// Created lazily with [`TransportConfig::default`] on first call; every
    /// later call returns a handle to the same underlying client.
    ///
    /// # Errors
    /// Returns `HttpError::Tls` if the shared transport could not be built.
    ///
    /// [`TransportConfig::default`]: crate::TransportConfig
    pub fn shared() -> Result<Self, HttpError> {
        let shared = SHARED_TRANSPORT.get_or_init(|| {
            #[cfg(test)]
            SHARED_BUILD_COUNT.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tracing::debug!("initializing shared transport");
            TransportBuilder::new().build().map_err(|e| e.to_string())
        });
        match shared {
            Ok(transport) => Ok(transport.clone()),
            Err(message) => Err(HttpError::Tls(message.clone().into())),
        }
    }

    /// Perform one round trip.
    ///
    /// The returned future is boxed and `Send`, so it can be spawned. It
    /// resolves to whatever the underlying service fails with; for the default
    /// stack that is `HttpError::Transport` for connection, DNS and TLS failures.
    #[must_use]
    pub fn execute(&self, request: Request<RequestBody>) -> TransportFuture {
        Box::pin(self.service.clone().oneshot(request))
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}
