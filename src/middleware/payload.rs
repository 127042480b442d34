//! Payload and parameter-encoding middleware.

use http::Method;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use url::form_urlencoded;

use crate::error::Error;
use crate::options::Options;
use crate::stack::{Middleware, Next};

/// URL-encodes key/value pairs once, at middleware construction.
fn encode_pairs<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Joins an encoded query onto an address with `?` or `&`.
fn append_query(address: &mut String, encoded: &str) {
    address.push(if address.contains('?') { '&' } else { '?' });
    address.push_str(encoded);
}

/// Writes a payload: body, byte-length `Content-Length`, optional
/// `Content-Type`.
fn write_payload(options: &mut Options, content: String, content_type: Option<&str>) {
    options.set_header(CONTENT_LENGTH.as_str(), content.len().to_string());
    if let Some(content_type) = content_type {
        options.set_header(CONTENT_TYPE.as_str(), content_type);
    }
    options.set_body(content);
}

/// Sets the request payload.
///
/// `Content-Length` is the byte length of the payload, which differs from
/// the character count for multi-byte content.
pub fn body(content: impl Into<String>, content_type: Option<&str>) -> impl Middleware {
    let content = content.into();
    let content_type = content_type.map(str::to_owned);
    move |next: Next, address: String, mut options: Options| {
        write_payload(&mut options, content.clone(), content_type.as_deref());
        next.run(address, options)
    }
}

/// Serializes `value` as the JSON request payload, with an
/// `application/json` content type.
///
/// Serialization happens once, at construction; a value that does not
/// serialize surfaces as a configuration error at call time, before the
/// transport runs. A pre-serialized string belongs in
/// [`body`]`(content, Some("application/json"))` — passing it here would
/// serialize it again, quotes and all.
pub fn json<T: Serialize>(value: T) -> impl Middleware {
    let payload = serde_json::to_string(&value).map_err(|e| e.to_string());
    move |next: Next, address: String, mut options: Options| {
        let payload = payload.clone();
        async move {
            match payload {
                Ok(content) => {
                    write_payload(&mut options, content, Some("application/json"));
                    next.run(address, options).await
                }
                Err(detail) => {
                    Err(Error::config(format!("json payload did not serialize: {detail}")))
                }
            }
        }
    }
}

/// Appends key/value pairs to the address query string.
///
/// Joins with `?` when the address has no query string yet, `&` when it
/// does.
pub fn query<I, K, V>(pairs: I) -> impl Middleware
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let encoded = encode_pairs(pairs);
    move |next: Next, mut address: String, options: Options| {
        append_query(&mut address, &encoded);
        next.run(address, options)
    }
}

/// Sends key/value pairs where the request method expects them.
///
/// GET and HEAD requests carry no payload, so the pairs go to the query
/// string; any other method gets a URL-encoded form payload. The dispatch
/// happens per call, on the method the options carry at this layer — push
/// [`method`](super::method) before `params` so it sees the final verb.
pub fn params<I, K, V>(pairs: I) -> impl Middleware
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let encoded = encode_pairs(pairs);
    move |next: Next, mut address: String, mut options: Options| {
        let verb = options.method();
        if verb == &Method::GET || verb == &Method::HEAD {
            append_query(&mut address, &encoded);
        } else {
            write_payload(
                &mut options,
                encoded.clone(),
                Some("application/x-www-form-urlencoded"),
            );
        }
        next.run(address, options)
    }
}
