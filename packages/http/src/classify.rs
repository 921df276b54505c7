//! Response classification and JSON decoding.
//!
//! [`classify_response`] is the single policy point for what counts as an
//! HTTP error: purely the response's own success indicator. Transport
//! failures never reach it; they propagate through the chain unclassified.

use serde_json::Value;

use crate::error::{FailureBody, FetchError, HttpFailure};
use crate::types::HttpResponse;

/// Whether a declared content type indicates a JSON body.
fn is_json_content_type(content_type: &str) -> bool {
    content_type == "application/json" || content_type.ends_with("+json")
}

/// Pass a successful response through unchanged; turn anything else into an
/// [`HttpFailure`] carrying the status, status text and body.
///
/// The body is kept structured when the response declares a JSON content type
/// and actually parses, otherwise verbatim text.
pub fn classify_response(response: HttpResponse) -> Result<HttpResponse, FetchError> {
    if response.is_success() {
        return Ok(response);
    }

    let declared_json = response.content_type().is_some_and(is_json_content_type);
    let body = if declared_json {
        match serde_json::from_str(&response.body) {
            Ok(value) => FailureBody::Json(value),
            // Keep the body verbatim rather than losing it to a parse error.
            Err(_) => FailureBody::Text(response.body),
        }
    } else {
        FailureBody::Text(response.body)
    };

    Err(FetchError::Http(HttpFailure {
        status: response.status,
        status_text: response.status_text,
        body,
    }))
}

/// Decode a response body as JSON.
///
/// An empty or whitespace-only body decodes to `Value::Null`, so bodyless
/// success responses (204 and friends) don't fail the `_json` verbs. A
/// malformed non-empty body is a [`FetchError::Json`].
pub fn decode_body(response: HttpResponse) -> Result<Value, FetchError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&response.body)?)
}
