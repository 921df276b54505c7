//! Failure taxonomy for fetch futures.
//!
//! Three kinds of failure flow through a fetch chain: the transport itself
//! failed, the server answered with a non-success status, or a body could not
//! be (de)serialized. All of them are `Clone` — a failure cause fans out to
//! every observer and every derived future — so non-`Clone` foreign errors
//! are wrapped in `Arc`.

use std::sync::Arc;

use serde_json::Value;

/// Error type carried by every fetch future.
#[derive(thiserror::Error, Debug, Clone)]
pub enum FetchError {
    /// The underlying call primitive failed before a response was received
    /// (connection refused, DNS, timeout). Propagates unclassified.
    #[error("transport failure: {0}")]
    Transport(Arc<reqwest::Error>),

    /// A response was received but its status signals non-success.
    #[error(transparent)]
    Http(HttpFailure),

    /// A request or response body could not be serialized or parsed as JSON.
    #[error("JSON error: {0}")]
    Json(Arc<serde_json::Error>),

    /// The endpoint could not be resolved to an absolute URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A header name or value in the options bag was not valid HTTP.
    #[error("invalid header: {message}")]
    InvalidHeader { message: String },

    /// A caller-supplied continuation failed.
    #[error("{message}")]
    Handler { message: String },
}

impl FetchError {
    /// Failure for application code inside `map`/`recover` chains.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// The HTTP status code, if this is a classified response failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(failure) => Some(failure.status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(Arc::new(error))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(Arc::new(error))
    }
}

/// A completed request whose response indicates non-success.
///
/// Built by response classification; callers never construct one directly.
#[derive(thiserror::Error, Debug, Clone)]
#[error("HTTP {status} {status_text}")]
pub struct HttpFailure {
    /// Numeric status code.
    pub status: u16,
    /// Reason phrase, e.g. "Not Found".
    pub status_text: String,
    /// Response body, structured when the response declared a JSON content
    /// type, otherwise raw text.
    pub body: FailureBody,
}

/// Body of a classified HTTP failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureBody {
    /// The response declared a JSON content type and parsed.
    Json(Value),
    /// Anything else, verbatim.
    Text(String),
}

impl HttpFailure {
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}
