#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Fluent HTTP request builder for `ModKit`
//!
//! This crate composes a client-wide *default* [`ParameterSet`] and a
//! per-call one into a single outgoing request, executes it through a
//! pluggable [`Transport`], and hands back an [`HttpResponse`] with:
//! - The fully drained body (the connection is released before you see it)
//! - Typed JSON decoding and JSONPath queries over the body
//! - Header and cookie export helpers
//! - A sticky error: the first failure of the pipeline, never a panic
//!
//! # Request pipeline
//!
//! Every call runs the same steps and stops at the first failure:
//! body encoding, request construction, configuration merge, transport
//! selection, round trip, body drain, response hooks. Failures before the
//! round trip never touch the network.
//!
//! # Transport
//!
//! The default transport is a pooled hyper client over rustls with
//! transparent decompression, redirect following and User-Agent injection.
//! It is created once per process on first use. A [`ParameterSet`] can carry
//! an override, for example one routed through an HTTP or SOCKS5 proxy.
//!
//! # Example
//!
//! ```ignore
//! use modkit_request::{Body, HttpClient, ParameterSet};
//!
//! let client = HttpClient::new(ParameterSet::new().header("x-tenant", "acme"));
//!
//! let mut resp = client
//!     .new_request()
//!     .cookie("session=abc")
//!     .json_request("POST", "https://example.com/api/orders", Body::json(&order))
//!     .await;
//!
//! let mut created = Order::default();
//! resp.decode_json(&mut created);
//! if let Some(err) = resp.error() {
//!     tracing::warn!(error = %err, "order creation failed");
//! }
//! let session = resp.export_cookie(&["session"]);
//! ```

mod body;
mod builder;
mod client;
mod config;
mod error;
mod layers;
mod params;
mod proxy;
mod query;
mod request;
mod response;
mod tls;
mod transport;

pub use body::{Body, JsonBody};
pub use builder::TransportBuilder;
pub use client::HttpClient;
pub use config::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, MergePolicy, TlsRootConfig, TransportConfig,
};
pub use error::{BoxError, ErrorStage, HttpError, InvalidUriKind};
pub use layers::{
    DefaultHeadersLayer, DefaultHeadersService, ProxyAuthLayer, ProxyAuthService,
};
pub use params::{Header, ParameterSet, ResponseHook};
pub use proxy::{ProxyConnector, ProxyStream};
pub use query::PathValue;
pub use request::RequestBuilder;
pub use response::HttpResponse;
pub use transport::{RequestBody, ResponseBody, Transport, TransportFuture};
