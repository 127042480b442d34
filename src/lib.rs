//! # strata
//!
//! A composable middleware stack for asynchronous HTTP fetching.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Your transport — reqwest, hyper, a test stub — performs requests. strata
//! does not, by design. The transport does transport things; strata only
//! governs how request-shaping functions compose and how a response flows
//! back through optional post-processing.
//!
//! What the transport already owns — strata intentionally ignores:
//!
//! - **Connection pooling, TLS, timeouts** — your HTTP client's job
//! - **Retries, caching, redirects** — client or proxy concerns
//! - **Wire semantics** — whatever protocol the transport speaks
//!
//! What's left for strata — the only part that changes between applications:
//!
//! - Middleware composition — an ordered [`Stack`] folded into one [`Fetch`],
//!   first-pushed layer outermost
//! - The response-handler channel — a flat, registration-ordered queue of
//!   post-processing functions carried on [`Options`]
//! - A catalog of standard [`middleware`] — headers, payloads, query strings,
//!   parsing, diagnostics
//!
//! ## Quick start
//!
//! ```rust
//! use strata::{create_fetch, Fetch, Options, Response, Stack};
//! use strata::middleware::{auth, base, parse_json, query};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), strata::Error> {
//! // The transport is any async (address, options) function, supplied by
//! // the host. Here: a stub that returns a JSON body.
//! let transport = Fetch::new(|_address, _options| async {
//!     Ok(Response::ok().with_body(&br#"{"hello":"world"}"#[..]))
//! });
//!
//! let api = create_fetch(
//!     transport,
//!     Stack::new()
//!         .push(base("https://api.example.com"))
//!         .push(auth("secret"))
//!         .push(query([("page", "2")]))
//!         .push(parse_json()),
//! );
//!
//! // Same shape as the transport, cumulative effects applied in order.
//! let response = api.call("/users", Options::new()).await?;
//! assert!(response.extension("body").is_some());
//! # Ok(())
//! # }
//! ```

mod error;
mod fetch;
mod headers;
mod options;
mod response;
mod stack;

pub mod middleware;

pub use error::{Error, ErrorKind, RequestInfo};
pub use fetch::{BoxFuture, Fetch, FetchResult, create_fetch, enhance_fetch};
pub use headers::Headers;
pub use options::{Options, ResponseHandler};
pub use response::Response;
pub use stack::{BoxedMiddleware, Middleware, Next, Stack};

pub use http::{Method, StatusCode};
