//! Minimal strata example — a composed API client over a stub transport.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! The transport is an in-memory stub so the example runs offline. Swap it
//! for one backed by your HTTP client of choice — strata only cares that it
//! is an async (address, options) function.

use strata::middleware::{auth, base, json, parse_json, request_info, trace};
use strata::{Fetch, Options, Response, Stack, create_fetch};

#[tokio::main]
async fn main() -> Result<(), strata::Error> {
    tracing_subscriber::fmt::init();

    let api = create_fetch(
        stub_transport(),
        Stack::new()
            .push(trace())
            .push(base("https://api.example.com"))
            .push(auth("Bearer demo-token"))
            .push(json(serde_json::json!({ "name": "alice" })))
            .push(parse_json())
            .push(request_info()),
    );

    let response = api.call("/users", Options::new()).await?;

    println!("status:  {}", response.status());
    println!("parsed:  {}", response.extension("body").unwrap());
    println!("request: {}", response.extension("requestAddress").unwrap());
    Ok(())
}

/// Echoes the request back as a JSON document, like a local httpbin.
fn stub_transport() -> Fetch {
    Fetch::new(|address, options: Options| async move {
        let reply = serde_json::json!({
            "address": address,
            "method": options.method().as_str(),
            "body": options.body(),
        });
        Ok(Response::ok()
            .with_header("content-type", "application/json")
            .with_body(reply.to_string().into_bytes()))
    })
}
