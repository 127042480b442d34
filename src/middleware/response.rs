//! Response-shaping middleware: the handler channel and body parsing.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Error;
use crate::options::{Options, ResponseHandler};
use crate::response::Response;
use crate::stack::{Middleware, Next};

/// Registers a response handler, then forwards the request untouched.
///
/// Handlers registered this way run after the transport resolves, in
/// registration order across the whole chain — a flat queue, unlike the
/// nested ordering of middleware that wrap [`Next::run`] directly. The queue
/// is drained by the [`enhance_fetch`](crate::enhance_fetch) adapter, which
/// [`create_fetch`](crate::create_fetch) applies automatically.
pub fn on_response(handler: impl ResponseHandler + 'static) -> impl Middleware {
    let handler: Arc<dyn ResponseHandler> = Arc::new(handler);
    move |next: Next, address: String, mut options: Options| {
        options.push_response_handler(Arc::clone(&handler));
        next.run(address, options)
    }
}

/// Response-body formats [`parse`] understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseKind {
    /// UTF-8 text, decorated as a JSON string.
    Text,
    /// A JSON document, decorated as its parsed value.
    Json,
}

impl ParseKind {
    fn parse(self, response: &Response) -> Result<Value, Error> {
        match self {
            Self::Text => String::from_utf8(response.body().to_vec())
                .map(Value::String)
                .map_err(|e| Error::parse("text", e.to_string())),
            Self::Json => serde_json::from_slice(response.body())
                .map_err(|e| Error::parse("json", e.to_string())),
        }
    }
}

/// Parses the response body, decorating the response under `"body"`.
pub fn parse(kind: ParseKind) -> impl Middleware {
    parse_as(kind, "body")
}

/// Parses the response body, decorating the response under `property`.
///
/// Runs on the handler channel, so the decoration is visible to every
/// later-registered handler and to the caller. A body that does not parse
/// fails the whole fetch with an error naming the parser.
pub fn parse_as(kind: ParseKind, property: impl Into<String>) -> impl Middleware {
    let property = property.into();
    on_response(move |mut response: Response| {
        let value = kind.parse(&response)?;
        response.set_extension(property.clone(), value);
        Ok(response)
    })
}

/// [`parse`] for UTF-8 text.
pub fn parse_text() -> impl Middleware {
    parse(ParseKind::Text)
}

/// [`parse`] for JSON.
pub fn parse_json() -> impl Middleware {
    parse(ParseKind::Json)
}
