//! HTTP execution abstraction.
//!
//! The rest of the crate depends on [`HttpExecutor`] as an opaque
//! asynchronous operation: one request in, one response or transport failure
//! out. The production implementation uses reqwest; tests swap in a mock so
//! no network is involved.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::error::FetchError;
use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
///
/// The request url must be absolute by the time it reaches the executor;
/// relative-url resolution happens in the fetch layer.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// A non-success status is still `Ok`: classification is a separate,
    /// later transform. `Err` means the transport itself failed.
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, FetchError> {
        Self::new(Duration::from_secs(30))
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let method: http::Method = request.method.clone().into();

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                FetchError::InvalidHeader {
                    message: e.to_string(),
                }
            })?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| {
                FetchError::InvalidHeader {
                    message: e.to_string(),
                }
            })?;
            headers.insert(header_name, header_value);
        }

        tracing::debug!(method = %method, url = %request.url, "dispatching request");

        let mut req_builder = self.client.request(method, &request.url);
        req_builder = req_builder.headers(headers);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().await?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut resp_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                resp_headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = response.text().await?;

        tracing::debug!(status, url = %request.url, "request settled");

        Ok(HttpResponse {
            status,
            status_text,
            headers: resp_headers,
            body,
        })
    }
}
