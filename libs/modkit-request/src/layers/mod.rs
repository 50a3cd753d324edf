//! Tower layers used by the transport stack
//!
//! - [`DefaultHeadersLayer`] - Adds fallback headers (User-Agent) to requests that lack them
//! - [`ProxyAuthLayer`] - Adds `Proxy-Authorization` to requests forwarded through an HTTP proxy

mod default_headers;
mod proxy_auth;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
pub use proxy_auth::{ProxyAuthLayer, ProxyAuthService};
