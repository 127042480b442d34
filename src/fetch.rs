//! The fetch function value, the transport adapter, and the fetch factory.
//!
//! # How fetches are stored
//!
//! A transport is any async `(address, options) → FetchResult` function. To
//! pass transports, composed stacks, and middleware continuations around as
//! one kind of value, the concrete function type is erased behind
//! `Arc<dyn Fn … -> BoxFuture>`:
//!
//! ```text
//! async fn transport(address, options) -> FetchResult   ← host supplies this
//!        ↓ Fetch::new(transport)
//! Arc<dyn Fn(String, Options) -> BoxFuture>             ← one shape for everything
//!        ↓ stack.bind(fetch) / create_fetch(…)
//! the same shape, wrapped layer by layer                ← still a Fetch
//! ```
//!
//! The per-request cost is one `Arc` clone and one virtual call per layer —
//! negligible next to the network.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::options::Options;
use crate::response::Response;
use crate::stack::Stack;

/// The outcome of one fetch: a resolved [`Response`] or an [`Error`].
pub type FetchResult = Result<Response, Error>;

/// A heap-allocated, type-erased future resolving to a [`FetchResult`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place; `Send` so it
/// can cross threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = FetchResult> + Send + 'static>>;

type FetchFn = Arc<dyn Fn(String, Options) -> BoxFuture + Send + Sync + 'static>;

/// An asynchronous `(address, options) → response` capability.
///
/// Both a raw transport and every composed stack have this shape, so a
/// composed fetch is substitutable wherever a transport is expected — layers
/// wrap layers without anyone noticing. Cloning is an `Arc` clone; a `Fetch`
/// holds no per-request state, so concurrent calls to one value are safe.
#[derive(Clone)]
pub struct Fetch {
    inner: FetchFn,
}

impl Fetch {
    /// Wraps an async function as a fetch capability.
    ///
    /// ```rust
    /// use strata::{Fetch, Response};
    ///
    /// let transport = Fetch::new(|_address, _options| async {
    ///     Ok(Response::ok())
    /// });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String, Options) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FetchResult> + Send + 'static,
    {
        Self { inner: Arc::new(move |address, options| Box::pin(f(address, options))) }
    }

    pub(crate) fn from_fn(inner: FetchFn) -> Self {
        Self { inner }
    }

    /// Performs one request.
    pub async fn call(&self, address: impl Into<String>, options: Options) -> FetchResult {
        (self.inner)(address.into(), options).await
    }

    /// Completion-callback entry point.
    ///
    /// Invokes `on_complete` with the settled result and resolves to `()`
    /// once the callback has run. A convenience counterpart of
    /// [`call`](Fetch::call) for callers structured around callbacks;
    /// composition semantics are identical.
    pub async fn call_with<F>(&self, address: impl Into<String>, options: Options, on_complete: F)
    where
        F: FnOnce(FetchResult) + Send,
    {
        on_complete(self.call(address, options).await);
    }

    /// Whether two fetches share the same underlying function.
    ///
    /// [`create_fetch`] with an empty stack returns its transport unchanged;
    /// this is how callers detect that no-op configuration.
    pub fn same_transport(&self, other: &Fetch) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fetch")
    }
}

// ── Transport adapter ─────────────────────────────────────────────────────────

/// Wraps a raw transport with the per-request plumbing that is not
/// composition itself: draining the response-handler queue.
///
/// After the inner transport resolves, handlers registered on the options run
/// in registration order, each receiving the previous handler's output; an
/// empty queue passes the response through untouched. On transport failure
/// the queue is skipped and the failure propagates as-is.
///
/// [`create_fetch`] applies this adapter for you; call it directly only when
/// binding a [`Stack`] to a transport by hand.
pub fn enhance_fetch(transport: Fetch) -> Fetch {
    Fetch::new(move |address, mut options: Options| {
        let transport = transport.clone();
        async move {
            let handlers = options.take_response_handlers();
            let mut response = transport.call(address, options).await?;
            for handler in &handlers {
                response = handler.handle(response)?;
            }
            Ok(response)
        }
    })
}

// ── Fetch factory ─────────────────────────────────────────────────────────────

/// Binds a middleware stack to a transport, producing a fetch with the same
/// shape as the transport.
///
/// An empty stack returns `transport` itself — identity, no wrapping — so
/// [`Fetch::same_transport`] holds between input and output. A non-empty
/// stack composes onto the [`enhance_fetch`]-adapted transport, giving every
/// layer a working response-handler channel.
///
/// ```rust
/// use strata::{create_fetch, Fetch, Options, Response, Stack};
/// use strata::middleware::header;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), strata::Error> {
/// let transport = Fetch::new(|_address, _options| async { Ok(Response::ok()) });
///
/// let plain = create_fetch(transport.clone(), Stack::new());
/// assert!(plain.same_transport(&transport));
///
/// let wrapped = create_fetch(
///     transport,
///     Stack::new().push(header("x-api-key", "secret")),
/// );
/// wrapped.call("/ping", Options::new()).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_fetch(transport: Fetch, stack: Stack) -> Fetch {
    if stack.is_empty() {
        return transport;
    }
    stack.bind(enhance_fetch(transport))
}
