use crate::body::Body;
use crate::config::MergePolicy;
use crate::params::ParameterSet;
use crate::request::RequestBuilder;
use crate::response::HttpResponse;
use std::sync::Arc;

/// Entry point holding the default [`ParameterSet`] shared by every request.
///
/// The default set is frozen once the client is built: it sits behind an
/// `Arc` and is only ever read, so requests may run concurrently from any
/// number of tasks without locking.
///
/// # Thread Safety
///
/// `HttpClient` is `Clone + Send + Sync`. Cloning copies an `Arc`; store the
/// client directly, no `Mutex` needed.
///
/// # Example
///
/// ```ignore
/// let client = HttpClient::new(
///     ParameterSet::new()
///         .header("x-tenant", "acme")
///         .response_hook(|resp| match resp.status() {
///             Some(status) if status.is_success() => Ok(()),
///             other => Err(format!("unexpected status {other:?}").into()),
///         }),
/// );
///
/// let resp = client.new_request().request("GET", "https://example.com/api", ()).await;
/// let name = resp.query_path("$.name").to_text();
/// ```
#[derive(Clone, Debug, Default)]
pub struct HttpClient {
    defaults: Arc<ParameterSet>,
    merge_policy: MergePolicy,
}

impl HttpClient {
    /// Create a client with the given default parameter set
    #[must_use]
    pub fn new(defaults: ParameterSet) -> Self {
        Self {
            defaults: Arc::new(defaults),
            merge_policy: MergePolicy::default(),
        }
    }

    /// Use `policy` for every builder created by this client
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// The shared default parameter set
    #[must_use]
    pub fn defaults(&self) -> &ParameterSet {
        &self.defaults
    }

    /// Merge policy applied to new builders
    #[must_use]
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Start a new one-shot request
    pub fn new_request(&self) -> RequestBuilder {
        RequestBuilder::new(Arc::clone(&self.defaults)).merge_policy(self.merge_policy)
    }

    /// Shorthand for `new_request().request(method, url, body)`
    pub async fn request(&self, method: &str, url: &str, body: impl Into<Body>) -> HttpResponse {
        self.new_request().request(method, url, body).await
    }

    /// Shorthand for `new_request().json_request(method, url, body)`
    pub async fn json_request(
        &self,
        method: &str,
        url: &str,
        body: impl Into<Body>,
    ) -> HttpResponse {
        self.new_request().json_request(method, url, body).await
    }
}
