//! Diagnostic middleware: request metadata, misuse detection, tracing.

use std::time::Instant;

use http::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Error;
use crate::options::Options;
use crate::stack::{Middleware, Next};

/// Decorates the outcome with the address and options that produced it.
///
/// On success the response gains `requestAddress` and `requestOptions`
/// extensions; on failure the error carries the same information, readable
/// via [`Error::request`] and [`Error::address`]. The snapshot is taken at
/// this layer, so push `request_info` after the middleware whose effects it
/// should record.
pub fn request_info() -> impl Middleware {
    move |next: Next, address: String, options: Options| async move {
        let sent = options.clone();
        match next.run(address.clone(), options).await {
            Ok(mut response) => {
                response.set_extension("requestAddress", Value::String(address));
                response.set_extension("requestOptions", sent.to_value());
                Ok(response)
            }
            Err(error) => Err(error.with_request(address, sent)),
        }
    }
}

/// Rejects requests whose options show common misuse, before any transport
/// call.
///
/// On non-GET/HEAD requests, two patterns fail with a validation diagnostic
/// naming the offending entry:
///
/// - a `data` extension entry — the transport only sends `body`, so `data`
///   is almost always a misspelling of it;
/// - a `body` extension entry holding a non-string value — a payload that
///   was never serialized.
///
/// Anything else forwards untouched. This is advisory tooling built from the
/// ordinary short-circuit pattern; it has no special standing in the chain.
pub fn catch_errors() -> impl Middleware {
    move |next: Next, address: String, options: Options| async move {
        let verb = options.method();
        if verb != &Method::GET && verb != &Method::HEAD {
            if options.extension("data").is_some() {
                return Err(Error::validation(
                    "options carry a `data` entry the transport will ignore; did you mean `body`?",
                ));
            }
            if let Some(value) = options.extension("body") {
                if !value.is_string() {
                    return Err(Error::validation(
                        "the `body` entry is not a string; serialize the payload before sending",
                    ));
                }
            }
        }
        next.run(address, options).await
    }
}

/// Emits one `tracing` event per request: method, address, status, and
/// elapsed time. `debug!` on success, `warn!` on failure.
pub fn trace() -> impl Middleware {
    move |next: Next, address: String, options: Options| async move {
        let method = options.method().clone();
        let started = Instant::now();
        let result = next.run(address.clone(), options).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(response) => {
                debug!(%method, %address, status = %response.status(), ?elapsed, "request completed");
            }
            Err(error) => {
                warn!(%method, %address, %error, ?elapsed, "request failed");
            }
        }
        result
    }
}
