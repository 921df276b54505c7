//! A reusable binding of a base address and default request options to the
//! verb functions.

use url::Url;

use crate::error::FetchError;
use crate::fetch::{self, FetchFuture, Fetcher};
use crate::types::{HttpRequest, HttpResponse, RequestOptions};

use serde::Serialize;
use serde_json::Value;

/// Immutable pairing of a base address and default request options.
///
/// Never mutated after construction; the [`Client`] builders produce a new
/// client with a new config.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base: Url,
    defaults: RequestOptions,
}

impl ClientConfig {
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }
}

/// An HTTP client bound to a base address.
///
/// Every verb method is equivalent to the corresponding free verb function
/// with the endpoint resolved against the base address and options merged as
/// defaults-then-per-call (per-call wins on key collision). No further state.
///
/// ```ignore
/// use eventual_http::{Client, RequestOptions};
///
/// let api = Client::new("https://api.example.com/")?
///     .with_default_header("authorization", "Bearer token");
///
/// let posts = api.get_json("posts", RequestOptions::new());
/// ```
#[derive(Clone)]
pub struct Client {
    fetcher: Fetcher,
    config: ClientConfig,
}

impl Client {
    /// A client over the default reqwest executor.
    pub fn new(base: &str) -> Result<Self, FetchError> {
        Self::with_fetcher(Fetcher::new()?, base)
    }

    /// A client over an existing fetch environment; its base address, if
    /// any, is replaced by this client's.
    pub fn with_fetcher(fetcher: Fetcher, base: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base)?;
        Ok(Self {
            fetcher: fetcher.with_base(base)?,
            config: ClientConfig {
                base: base_url,
                defaults: RequestOptions::new(),
            },
        })
    }

    /// Add a default header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.config.defaults.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the default request options.
    pub fn with_defaults(mut self, defaults: RequestOptions) -> Self {
        self.config.defaults = defaults;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn merged(&self, per_call: RequestOptions) -> RequestOptions {
        RequestOptions::merge(&self.config.defaults, &per_call)
    }

    /// Issue an arbitrary request under this client's defaults. Entries set
    /// explicitly on the request win over the defaults.
    pub fn request(&self, request: HttpRequest) -> FetchFuture<HttpResponse> {
        fetch::fetch(
            &self.fetcher,
            request.with_fallback_options(self.config.defaults.clone()),
        )
    }

    pub fn get(&self, endpoint: &str, options: RequestOptions) -> FetchFuture<HttpResponse> {
        fetch::get(&self.fetcher, endpoint, self.merged(options))
    }

    pub fn get_json(&self, endpoint: &str, options: RequestOptions) -> FetchFuture<Value> {
        fetch::get_json(&self.fetcher, endpoint, self.merged(options))
    }

    pub fn post(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<HttpResponse> {
        fetch::post(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn post_json(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<Value> {
        fetch::post_json(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn put(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<HttpResponse> {
        fetch::put(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn put_json(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<Value> {
        fetch::put_json(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn patch(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<HttpResponse> {
        fetch::patch(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn patch_json(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        options: RequestOptions,
    ) -> FetchFuture<Value> {
        fetch::patch_json(&self.fetcher, endpoint, body, self.merged(options))
    }

    pub fn delete(&self, endpoint: &str, options: RequestOptions) -> FetchFuture<HttpResponse> {
        fetch::delete(&self.fetcher, endpoint, self.merged(options))
    }

    pub fn delete_json(&self, endpoint: &str, options: RequestOptions) -> FetchFuture<Value> {
        fetch::delete_json(&self.fetcher, endpoint, self.merged(options))
    }
}
