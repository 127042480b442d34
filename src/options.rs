//! Per-request configuration threaded through the middleware chain.
//!
//! Each top-level call owns one [`Options`] value. Middleware receive it by
//! value, mutate it, and forward it via [`Next::run`](crate::Next::run), so
//! every layer observes the mutations of the layers before it. Nothing is
//! shared across requests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::Method;
use serde_json::Value;

use crate::fetch::FetchResult;
use crate::headers::Headers;
use crate::response::Response;

// ── Response handlers ─────────────────────────────────────────────────────────

/// A response post-processing function registered on [`Options`].
///
/// Handlers take the response by value and return it, possibly decorated with
/// extensions. They run after the transport resolves, in registration order —
/// each handler receives the previous handler's output, so later handlers see
/// earlier decorations. On transport failure the queue is skipped entirely.
///
/// Implemented automatically for any `Fn(Response) -> FetchResult`.
pub trait ResponseHandler: Send + Sync {
    fn handle(&self, response: Response) -> FetchResult;
}

impl<F> ResponseHandler for F
where
    F: Fn(Response) -> FetchResult + Send + Sync,
{
    fn handle(&self, response: Response) -> FetchResult {
        (self)(response)
    }
}

pub(crate) type BoxedResponseHandler = Arc<dyn ResponseHandler>;

// ── Options ───────────────────────────────────────────────────────────────────

/// Configuration for one request.
///
/// Standard fields are typed: method (defaults to `GET`), headers, and a
/// string payload. Everything else — middleware-private state, diagnostic
/// markers — goes through the extension map. The response-handler queue is a
/// reserved field written via [`Options::on_response`].
#[derive(Clone, Default)]
pub struct Options {
    method: Method,
    headers: Headers,
    body: Option<String>,
    extensions: BTreeMap<String, Value>,
    response_handlers: Vec<BoxedResponseHandler>,
}

impl Options {
    /// An empty `GET` with no headers, body, or extensions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> &Method { &self.method }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn headers(&self) -> &Headers { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Sets a header, overwriting any existing value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Reads one extension entry.
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// Writes one extension entry, overwriting any existing value.
    pub fn set_extension(&mut self, name: impl Into<String>, value: Value) {
        self.extensions.insert(name.into(), value);
    }

    /// Appends a handler to the response-handler queue.
    ///
    /// The queue is drained in registration order after the transport
    /// resolves; see [`enhance_fetch`](crate::enhance_fetch).
    pub fn on_response(&mut self, handler: impl ResponseHandler + 'static) {
        self.response_handlers.push(Arc::new(handler));
    }

    pub fn response_handler_count(&self) -> usize {
        self.response_handlers.len()
    }

    pub(crate) fn push_response_handler(&mut self, handler: BoxedResponseHandler) {
        self.response_handlers.push(handler);
    }

    pub(crate) fn take_response_handlers(&mut self) -> Vec<BoxedResponseHandler> {
        std::mem::take(&mut self.response_handlers)
    }

    /// JSON snapshot of these options for diagnostics.
    ///
    /// Registered response handlers appear as a count, not as values; empty
    /// fields are omitted.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("method".to_owned(), Value::String(self.method.to_string()));

        let headers: serde_json::Map<String, Value> = self.headers.iter()
            .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
            .collect();
        map.insert("headers".to_owned(), Value::Object(headers));

        if let Some(body) = &self.body {
            map.insert("body".to_owned(), Value::String(body.clone()));
        }
        if !self.extensions.is_empty() {
            let extensions = self.extensions.iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            map.insert("extensions".to_owned(), Value::Object(extensions));
        }
        if !self.response_handlers.is_empty() {
            map.insert(
                "responseHandlers".to_owned(),
                Value::from(self.response_handlers.len()),
            );
        }
        Value::Object(map)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("extensions", &self.extensions)
            .field("response_handlers", &self.response_handlers.len())
            .finish()
    }
}
