use crate::error::HttpError;
use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::{Request, Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that fills in headers the caller did not set.
///
/// Headers already present on the request are never replaced, so values
/// merged from a `ParameterSet` always win over transport defaults.
#[derive(Clone, Debug)]
pub struct DefaultHeadersLayer {
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl DefaultHeadersLayer {
    /// Layer that only supplies a `User-Agent`
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` if the user agent string is not valid
    pub fn user_agent(user_agent: impl AsRef<str>) -> Result<Self, HttpError> {
        let value = HeaderValue::from_str(user_agent.as_ref())?;
        Ok(Self {
            headers: Arc::from(vec![(USER_AGENT, value)]),
        })
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service produced by [`DefaultHeadersLayer`]
#[derive(Clone, Debug)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in self.headers.iter() {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}
