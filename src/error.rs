//! Unified error type.

use std::fmt;

use crate::options::Options;

/// The error type surfaced by composed fetches.
///
/// HTTP error statuses are not `Error`s — they resolve as ordinary
/// [`Response`](crate::Response) values. This type covers the failures the
/// pipeline itself can produce: middleware configuration faults, pre-dispatch
/// validation, transport failure, and response parsing. Diagnostic middleware
/// may attach the originating address and options via
/// [`with_request`](Error::with_request); the core never swallows a failure.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    request: Option<Box<RequestInfo>>,
}

/// What went wrong, and at which stage.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A middleware was constructed with an unusable value. Surfaces before
    /// any transport call.
    #[error("invalid middleware configuration: {0}")]
    Config(String),

    /// Options failed pre-dispatch validation; the transport was never
    /// invoked.
    #[error("invalid request options: {0}")]
    Validation(String),

    /// The transport itself failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response-body parser failed on the resolved payload.
    #[error("{parser} parsing failed: {detail}")]
    Parse {
        parser: &'static str,
        detail: String,
    },
}

/// The address and options a failed request was dispatched with.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub address: String,
    pub options: Options,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        ErrorKind::Config(message.into()).into()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ErrorKind::Validation(message.into()).into()
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ErrorKind::Transport(message.into()).into()
    }

    pub fn parse(parser: &'static str, detail: impl Into<String>) -> Self {
        ErrorKind::Parse { parser, detail: detail.into() }.into()
    }

    /// Attaches the originating address and options, replacing any earlier
    /// attachment.
    pub fn with_request(mut self, address: impl Into<String>, options: Options) -> Self {
        self.request = Some(Box::new(RequestInfo { address: address.into(), options }));
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The attached request diagnostics, if a middleware recorded them.
    pub fn request(&self) -> Option<&RequestInfo> {
        self.request.as_deref()
    }

    /// The address of the failed request, if recorded.
    pub fn address(&self) -> Option<&str> {
        self.request.as_deref().map(|info| info.address.as_str())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(info) = &self.request {
            write!(f, " ({})", info.address)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, request: None }
    }
}
