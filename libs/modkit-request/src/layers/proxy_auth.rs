use http::header::{HeaderValue, PROXY_AUTHORIZATION};
use http::uri::Scheme;
use http::{Request, Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower layer that adds `Proxy-Authorization` to plain `http://` requests.
///
/// Those requests are forwarded to the proxy in absolute form, so the proxy
/// reads its credentials from the request itself. `https://` requests go
/// through a `CONNECT` tunnel that authenticates on its own and never carry
/// the header to the origin.
#[derive(Clone, Debug)]
pub struct ProxyAuthLayer {
    value: HeaderValue,
}

impl ProxyAuthLayer {
    /// Layer sending `value` as the proxy credentials
    #[must_use]
    pub fn new(value: HeaderValue) -> Self {
        Self { value }
    }
}

impl<S> Layer<S> for ProxyAuthLayer {
    type Service = ProxyAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ProxyAuthService {
            inner,
            value: self.value.clone(),
        }
    }
}

/// Service produced by [`ProxyAuthLayer`]
#[derive(Clone, Debug)]
pub struct ProxyAuthService<S> {
    inner: S,
    value: HeaderValue,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ProxyAuthService<S>
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
        if req.uri().scheme() == Some(&Scheme::HTTP)
            && !req.headers().contains_key(PROXY_AUTHORIZATION)
        {
            req.headers_mut().insert(PROXY_AUTHORIZATION, self.value.clone());
        }
        self.inner.call(req)
    }
}
