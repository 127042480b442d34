//! Header-setting middleware.

use http::header::{ACCEPT, AUTHORIZATION};

use crate::options::Options;
use crate::stack::{Middleware, Next};

/// Sets one request header, overwriting any existing value.
pub fn header(name: impl Into<String>, value: impl Into<String>) -> impl Middleware {
    let name = name.into();
    let value = value.into();
    move |next: Next, address: String, mut options: Options| {
        options.set_header(name.clone(), value.clone());
        next.run(address, options)
    }
}

/// Sets the `Authorization` request header.
pub fn auth(credentials: impl Into<String>) -> impl Middleware {
    header(AUTHORIZATION.as_str(), credentials)
}

/// Sets the `Authorization` request header to a bearer token.
pub fn bearer_token(token: impl AsRef<str>) -> impl Middleware {
    auth(format!("Bearer {}", token.as_ref()))
}

/// Sets the `Accept` request header.
pub fn accept(content_type: impl Into<String>) -> impl Middleware {
    header(ACCEPT.as_str(), content_type)
}
