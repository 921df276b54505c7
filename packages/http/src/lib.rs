//! # eventual-http
//!
//! HTTP verb layer producing reactive fetch futures.
//!
//! Every call here wraps exactly one network request in an
//! [`Eventual`](eventual_core::Eventual): bind to the future, chain
//! transformations, or await its outcome. Nothing is cached, retried or
//! cancelled; one call, one future, one settlement.
//!
//! ## Free verb functions
//!
//! Verb functions take a [`Fetcher`] — the explicit fetch environment
//! (executor plus default base address) — and return either the raw response
//! future or its classified, JSON-decoded counterpart:
//!
//! ```ignore
//! use eventual_http::{fetch, Fetcher, RequestOptions};
//!
//! let env = Fetcher::new()?.with_base("https://api.example.com/")?;
//!
//! // Raw response future
//! let response = fetch::get(&env, "users/1", RequestOptions::new());
//!
//! // Classified + JSON-decoded future
//! let user = fetch::get_json(&env, "users/1", RequestOptions::new());
//! ```
//!
//! ## Client
//!
//! A [`Client`] binds a base address and default options to the same verbs:
//!
//! ```ignore
//! use eventual_http::{Client, RequestOptions};
//!
//! let api = Client::new("https://api.example.com/")?
//!     .with_default_header("authorization", "Bearer token");
//!
//! let created = api.post_json("posts", &new_post, RequestOptions::new());
//! let _sub = created.observe(|state| render(state));
//! ```
//!
//! ## Errors
//!
//! Non-success responses become [`HttpFailure`] via [`classify_response`];
//! transport failures propagate unclassified; malformed JSON is
//! [`FetchError::Json`]. Intercept any of them with
//! [`recover`](eventual_core::Eventual::recover) on the returned future.

pub mod classify;
pub mod client;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod types;

// Re-export main types
pub use classify::{classify_response, decode_body};
pub use client::{Client, ClientConfig};
pub use error::{FailureBody, FetchError, HttpFailure};
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use fetch::{fetch, json_decoded, FetchFuture, Fetcher};
pub use types::{HttpRequest, HttpResponse, Method, RequestOptions};

// The core future type, re-exported for convenience
pub use eventual_core::{Eventual, ObservedState, Subscription};
