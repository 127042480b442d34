//! The response value a transport resolves with.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

use crate::headers::Headers;

/// A resolved HTTP response.
///
/// HTTP error statuses are data, not failures — a 404 resolves exactly like a
/// 200, and only transport failure rejects. Response handlers may decorate a
/// response with named extensions (a parsed body, request diagnostics) while
/// the raw status, headers, and body stay untouched.
///
/// Transports build responses with the chaining constructors:
///
/// ```rust
/// use strata::{Response, StatusCode};
///
/// Response::ok()
///     .with_header("content-type", "application/json")
///     .with_body(&br#"{"id":1}"#[..]);
///
/// Response::new(StatusCode::NOT_FOUND);
/// ```
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Bytes,
    extensions: BTreeMap<String, Value>,
}

impl Response {
    /// A response with the given status and no headers or body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
            extensions: BTreeMap::new(),
        }
    }

    /// `200 OK`, empty.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Adds a header, overwriting any existing value under the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Replaces the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode { self.status }

    pub fn headers(&self) -> &Headers { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Reads one decoration.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// Writes one decoration, overwriting any existing value.
    pub fn set_extension(&mut self, name: impl Into<String>, value: Value) {
        self.extensions.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chaining_constructors_build_the_response() {
        let response = Response::ok()
            .with_header("content-type", "text/plain")
            .with_body(&b"hello"[..]);

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.body(), b"hello");
    }

    #[test]
    fn extensions_decorate_without_touching_the_body() {
        let mut response = Response::ok().with_body(&b"raw"[..]);
        response.set_extension("body", json!({"parsed": true}));

        assert_eq!(response.body(), b"raw");
        assert_eq!(response.extension("body"), Some(&json!({"parsed": true})));
    }

    #[test]
    fn error_statuses_are_plain_data() {
        let response = Response::new(StatusCode::NOT_FOUND);
        assert_eq!(response.status().as_u16(), 404);
    }
}
