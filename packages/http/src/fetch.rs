//! The request-call primitive and the free verb functions.
//!
//! [`fetch`] wraps exactly one executor call in a reactive future. Each verb
//! function builds the request descriptor for its method and delegates to
//! `fetch`; the `_json` variants chain classification and JSON decoding onto
//! the same future.

use std::sync::Arc;

use eventual_core::Eventual;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::classify::{classify_response, decode_body};
use crate::error::FetchError;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::types::{HttpRequest, HttpResponse, RequestOptions};

/// A reactive future for one in-flight request: observers see `None` until
/// settlement. Re-placeholder with
/// [`with_placeholder`](eventual_core::Eventual::with_placeholder) to show a
/// cached value instead.
pub type FetchFuture<U> = Eventual<Option<U>, U, FetchError>;

/// The fetch environment: an executor plus the default base address that
/// relative endpoints resolve against when used outside a client.
///
/// This is deliberately an explicit value rather than process-global state;
/// construct one and pass it to the verb functions, or let a
/// [`Client`](crate::Client) carry it for you.
#[derive(Clone)]
pub struct Fetcher {
    executor: Arc<dyn HttpExecutor>,
    base: Option<Url>,
}

impl Fetcher {
    /// A fetcher backed by the default reqwest executor, with no base
    /// address: only absolute endpoints resolve.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            executor: Arc::new(ReqwestExecutor::with_default_timeout()?),
            base: None,
        })
    }

    /// A fetcher backed by the given executor.
    pub fn with_executor(executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            executor,
            base: None,
        }
    }

    /// Set the default base address for relative endpoints.
    pub fn with_base(mut self, base: &str) -> Result<Self, FetchError> {
        self.base = Some(Url::parse(base)?);
        Ok(self)
    }

    /// Resolve an endpoint: absolute URLs pass through, relative ones join
    /// the base address.
    fn resolve(&self, endpoint: &str) -> Result<Url, FetchError> {
        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base {
                Some(base) => Ok(base.join(endpoint)?),
                None => Err(FetchError::Url(url::ParseError::RelativeUrlWithoutBase)),
            },
            Err(error) => Err(error.into()),
        }
    }
}

/// Issue an arbitrary request and wrap its eventual response.
///
/// Never blocks; the executor call is started immediately. A URL that cannot
/// be resolved produces an already-failed future rather than a panic, so the
/// caller's chain and observers still see the failure.
pub fn fetch(fetcher: &Fetcher, request: HttpRequest) -> FetchFuture<HttpResponse> {
    let resolved = match fetcher.resolve(&request.url) {
        Ok(url) => url,
        Err(error) => return Eventual::from_result(None, Err(error)),
    };
    let request = HttpRequest {
        url: resolved.into(),
        ..request
    };
    let executor = fetcher.executor.clone();
    Eventual::new(None, async move { executor.perform(request).await })
}

/// Chain error classification and JSON decoding onto a raw response future.
///
/// The decoded future starts from an empty placeholder of its own; the raw
/// response placeholder does not carry over.
pub fn json_decoded(future: FetchFuture<HttpResponse>) -> FetchFuture<Value> {
    future
        .map(classify_response)
        .map(decode_body)
        .with_placeholder(None)
}

fn fetch_with_body(
    fetcher: &Fetcher,
    request: HttpRequest,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<HttpResponse> {
    let body = match serde_json::to_value(body) {
        Ok(value) => value,
        Err(error) => return Eventual::from_result(None, Err(error.into())),
    };
    fetch(fetcher, request.with_options(options).with_json_body(body))
}

pub fn get(fetcher: &Fetcher, endpoint: &str, options: RequestOptions) -> FetchFuture<HttpResponse> {
    fetch(fetcher, HttpRequest::get(endpoint).with_options(options))
}

pub fn get_json(fetcher: &Fetcher, endpoint: &str, options: RequestOptions) -> FetchFuture<Value> {
    json_decoded(get(fetcher, endpoint, options))
}

pub fn post(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<HttpResponse> {
    fetch_with_body(fetcher, HttpRequest::post(endpoint), body, options)
}

pub fn post_json(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<Value> {
    json_decoded(post(fetcher, endpoint, body, options))
}

pub fn put(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<HttpResponse> {
    fetch_with_body(fetcher, HttpRequest::put(endpoint), body, options)
}

pub fn put_json(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<Value> {
    json_decoded(put(fetcher, endpoint, body, options))
}

pub fn patch(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<HttpResponse> {
    fetch_with_body(fetcher, HttpRequest::patch(endpoint), body, options)
}

pub fn patch_json(
    fetcher: &Fetcher,
    endpoint: &str,
    body: &impl Serialize,
    options: RequestOptions,
) -> FetchFuture<Value> {
    json_decoded(patch(fetcher, endpoint, body, options))
}

pub fn delete(
    fetcher: &Fetcher,
    endpoint: &str,
    options: RequestOptions,
) -> FetchFuture<HttpResponse> {
    fetch(fetcher, HttpRequest::delete(endpoint).with_options(options))
}

pub fn delete_json(fetcher: &Fetcher, endpoint: &str, options: RequestOptions) -> FetchFuture<Value> {
    json_decoded(delete(fetcher, endpoint, options))
}
