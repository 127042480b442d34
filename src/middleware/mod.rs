//! The standard middleware catalog.
//!
//! Everything here is a thin layer over the composition core: each
//! constructor returns an `impl Middleware` that mutates the address or
//! options before forwarding, registers a response handler, or wraps the
//! continuation's result. None of them are special — your own middleware
//! compose on equal footing.
//!
//! Request shaping:
//! - [`method`], [`header`], [`auth`], [`bearer_token`], [`accept`]
//! - [`base`], [`query`], [`init`]
//! - [`body`], [`json`], [`params`]
//!
//! Response shaping:
//! - [`on_response`], [`parse`], [`parse_as`], [`parse_text`], [`parse_json`]
//!
//! Diagnostics:
//! - [`request_info`], [`catch_errors`], [`trace`]

mod diagnostics;
mod headers;
mod payload;
mod request;
mod response;

pub use diagnostics::{catch_errors, request_info, trace};
pub use headers::{accept, auth, bearer_token, header};
pub use payload::{body, json, params, query};
pub use request::{base, init, method};
pub use response::{ParseKind, on_response, parse, parse_as, parse_json, parse_text};
