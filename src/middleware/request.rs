//! Request-shaping middleware: method, base address, raw extension entries.

use http::Method;
use serde_json::Value;

use crate::options::Options;
use crate::stack::{Middleware, Next};

/// Sets the request method.
pub fn method(verb: Method) -> impl Middleware {
    move |next: Next, address: String, mut options: Options| {
        options.set_method(verb.clone());
        next.run(address, options)
    }
}

/// Prepends a base to the request address.
///
/// With an empty address the base alone is used, so a fully-specified base
/// doubles as a default address.
pub fn base(prefix: impl Into<String>) -> impl Middleware {
    let prefix = prefix.into();
    move |next: Next, address: String, options: Options| {
        next.run(format!("{prefix}{address}"), options)
    }
}

/// Sets one extension entry on the options.
///
/// Extensions are the side-channel for middleware-private state; standard
/// request fields have typed setters on [`Options`].
pub fn init(name: impl Into<String>, value: Value) -> impl Middleware {
    let name = name.into();
    move |next: Next, address: String, mut options: Options| {
        options.set_extension(name.clone(), value.clone());
        next.run(address, options)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fetch::Fetch;
    use crate::response::Response;

    fn echo() -> Fetch {
        Fetch::new(|address, options: Options| async move {
            let mut response = Response::ok();
            response.set_extension("input", Value::String(address));
            response.set_extension("options", options.to_value());
            Ok(response)
        })
    }

    #[tokio::test]
    async fn method_sets_the_request_method() {
        let response = method(Method::PUT)
            .handle(Next::new(echo()), "/".to_owned(), Options::new())
            .await
            .unwrap();
        assert_eq!(response.extension("options").unwrap()["method"], "PUT");
    }

    #[tokio::test]
    async fn base_prepends_to_the_address() {
        let response = base("https://api.stripe.com")
            .handle(Next::new(echo()), "/customers".to_owned(), Options::new())
            .await
            .unwrap();
        assert_eq!(
            response.extension("input"),
            Some(&json!("https://api.stripe.com/customers")),
        );
    }

    #[tokio::test]
    async fn base_stands_alone_when_no_address_is_given() {
        let response = base("https://api.stripe.com/customers")
            .handle(Next::new(echo()), String::new(), Options::new())
            .await
            .unwrap();
        assert_eq!(
            response.extension("input"),
            Some(&json!("https://api.stripe.com/customers")),
        );
    }

    #[tokio::test]
    async fn init_sets_an_extension_entry() {
        let response = init("credentials", json!("include"))
            .handle(Next::new(echo()), "/".to_owned(), Options::new())
            .await
            .unwrap();
        let options = response.extension("options").unwrap();
        assert_eq!(options["extensions"]["credentials"], json!("include"));
    }
}
