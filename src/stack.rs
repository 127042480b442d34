//! The middleware contract and stack composition.
//!
//! # How the onion is built
//!
//! A stack `[a, b, c]` bound to transport `t` composes right-to-left into
//!
//! ```text
//! a( b( c( t ) ) )
//! ```
//!
//! so `a` — the first unit pushed — is the outermost layer: its request phase
//! runs first on the way in and its response phase runs last on the way out.
//! Definition order equals request-phase order and is the reverse of
//! response-phase order, for any stack depth.
//!
//! Note the contrast with the response-handler queue on
//! [`Options`](crate::Options): handlers are a flat queue drained in
//! registration order, deliberately not nested. Wrapping [`Next::run`] and
//! registering a handler are two different ordering regimes for
//! response-side work.

use std::future::Future;
use std::sync::Arc;

use crate::fetch::{BoxFuture, Fetch, FetchResult};
use crate::options::Options;

// ── Middleware contract ───────────────────────────────────────────────────────

/// A composable request/response transformation.
///
/// A unit receives the rest of the chain as a 2-argument continuation and
/// must do exactly one of:
///
/// - forward via [`Next::run`] — after mutating the address or options, and
///   optionally transforming the result on the way back out, or
/// - short-circuit with its own `Ok`/`Err`, in which case nothing downstream
///   (including the transport) runs.
///
/// Implemented automatically for any
/// `Fn(Next, String, Options) -> impl Future<Output = FetchResult>`, so a
/// closure is a middleware:
///
/// ```rust
/// use strata::{Middleware, Next, Options};
///
/// fn prefix(p: &'static str) -> impl Middleware {
///     move |next: Next, address: String, options: Options| {
///         next.run(format!("{p}{address}"), options)
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, next: Next, address: String, options: Options) -> BoxFuture;
}

/// Closures and `async fn`s with the right shape are middleware.
impl<F, Fut> Middleware for F
where
    F: Fn(Next, String, Options) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    fn handle(&self, next: Next, address: String, options: Options) -> BoxFuture {
        Box::pin((self)(next, address, options))
    }
}

/// A heap-allocated middleware shared by every binding of a stack.
pub type BoxedMiddleware = Arc<dyn Middleware>;

// ── Next ──────────────────────────────────────────────────────────────────────

/// The continuation handed to a middleware: the remainder of the chain as a
/// plain 2-argument async function.
///
/// At the innermost position this is the transport itself; everywhere else it
/// is the next layer in. `run` consumes the continuation, making the protocol
/// explicit: a unit forwards at most once per invocation.
pub struct Next {
    inner: Fetch,
}

impl Next {
    pub(crate) fn new(inner: Fetch) -> Self {
        Self { inner }
    }

    /// Continues the chain with the given address and options.
    pub async fn run(self, address: impl Into<String>, options: Options) -> FetchResult {
        self.inner.call(address, options).await
    }

    pub(crate) fn into_fetch(self) -> Fetch {
        self.inner
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────────

/// An ordered middleware sequence, composable into a single [`Fetch`].
///
/// Build by chaining — each [`push`](Stack::push) returns `self` — then bind
/// to any transport:
///
/// ```rust
/// use strata::{Fetch, Options, Response, Stack};
/// use strata::middleware::{header, query};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), strata::Error> {
/// let stack = Stack::new()
///     .push(header("x-api-key", "secret"))
///     .push(query([("page", "2")]));
///
/// let transport = Fetch::new(|_address, _options| async { Ok(Response::ok()) });
/// stack.bind(transport).call("/users", Options::new()).await?;
/// # Ok(())
/// # }
/// ```
///
/// A `Stack` is itself a [`Middleware`], so stacks nest inside larger stacks.
#[derive(Clone, Default)]
pub struct Stack {
    layers: Vec<BoxedMiddleware>,
}

impl Stack {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a unit as the new innermost layer. Returns `self` so
    /// registrations chain.
    pub fn push(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    pub fn len(&self) -> usize { self.layers.len() }
    pub fn is_empty(&self) -> bool { self.layers.is_empty() }

    /// Composes the stack against `transport`, producing one fetch.
    ///
    /// Folds right-to-left so the first-pushed unit ends up outermost; each
    /// unit's 3-argument form is adapted to hand the next layer in as a clean
    /// 2-argument [`Next`]. Composition happens once per `bind`; the returned
    /// fetch can be retained and called concurrently.
    ///
    /// An empty stack composes to `transport` itself, unchanged — identity
    /// pass-through, the same policy as
    /// [`create_fetch`](crate::create_fetch)'s zero-middleware case.
    ///
    /// `bind` does not apply [`enhance_fetch`](crate::enhance_fetch); pass an
    /// adapted transport when the response-handler channel should be live.
    pub fn bind(&self, transport: Fetch) -> Fetch {
        let mut next = transport;
        for layer in self.layers.iter().rev() {
            let layer = Arc::clone(layer);
            let inner = next;
            next = Fetch::from_fn(Arc::new(move |address, options| {
                layer.handle(Next::new(inner.clone()), address, options)
            }));
        }
        next
    }
}

/// Stacks nest: pushing a stack composes it in place as one unit.
impl Middleware for Stack {
    fn handle(&self, next: Next, address: String, options: Options) -> BoxFuture {
        let composed = self.bind(next.into_fetch());
        Box::pin(async move { composed.call(address, options).await })
    }
}

impl FromIterator<BoxedMiddleware> for Stack {
    fn from_iter<I: IntoIterator<Item = BoxedMiddleware>>(iter: I) -> Self {
        Self { layers: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::response::Response;

    /// Transport stub: resolves with the final address and options captured
    /// as response extensions.
    fn echo() -> Fetch {
        Fetch::new(|address, options: Options| async move {
            let mut response = Response::ok();
            response.set_extension("input", Value::String(address));
            response.set_extension("options", options.to_value());
            Ok(response)
        })
    }

    /// Appends `n` to a `pushed` extension on the options before forwarding.
    fn push_marker(n: u64) -> impl Middleware {
        move |next: Next, address: String, mut options: Options| {
            let mut pushed = options
                .extension("pushed")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            pushed.push(json!(n));
            options.set_extension("pushed", Value::Array(pushed));
            next.run(address, options)
        }
    }

    /// Appends `tag` to a `trail` extension on the response after the chain
    /// resolves.
    fn tag_response(tag: &'static str) -> impl Middleware {
        move |next: Next, address: String, options: Options| async move {
            let mut response = next.run(address, options).await?;
            let mut trail = response
                .extension("trail")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            trail.push(json!(tag));
            response.set_extension("trail", Value::Array(trail));
            Ok(response)
        }
    }

    #[tokio::test]
    async fn request_phases_run_in_definition_order() {
        let stack = Stack::new()
            .push(push_marker(1))
            .push(push_marker(2))
            .push(push_marker(3));

        let response = stack.bind(echo()).call("/", Options::new()).await.unwrap();
        let options = response.extension("options").unwrap();
        assert_eq!(options["extensions"]["pushed"], json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn response_phases_unwind_in_reverse_definition_order() {
        let stack = Stack::new()
            .push(tag_response("a"))
            .push(tag_response("b"))
            .push(tag_response("c"));

        let response = stack.bind(echo()).call("/", Options::new()).await.unwrap();
        assert_eq!(response.extension("trail"), Some(&json!(["c", "b", "a"])));
    }

    #[tokio::test]
    async fn a_single_layer_holds_both_orderings() {
        let stack = Stack::new().push(tag_response("only"));

        let response = stack.bind(echo()).call("/", Options::new()).await.unwrap();
        assert_eq!(response.extension("trail"), Some(&json!(["only"])));
    }

    #[tokio::test]
    async fn empty_stack_binds_to_the_transport_itself() {
        let transport = echo();
        let bound = Stack::new().bind(transport.clone());

        assert!(bound.same_transport(&transport));
    }

    #[tokio::test]
    async fn middleware_transform_the_address_on_the_way_in() {
        let stack = Stack::new().push(|next: Next, address: String, options: Options| {
            next.run(format!("/v2{address}"), options)
        });

        let response = stack.bind(echo()).call("/users", Options::new()).await.unwrap();
        assert_eq!(response.extension("input"), Some(&json!("/v2/users")));
    }

    #[tokio::test]
    async fn later_middleware_observe_earlier_mutations() {
        let stack = Stack::new()
            .push(|next: Next, address: String, mut options: Options| {
                options.set_header("x-first", "1");
                next.run(address, options)
            })
            .push(|next: Next, address: String, options: Options| async move {
                assert_eq!(options.header("x-first"), Some("1"));
                next.run(address, options).await
            });

        stack.bind(echo()).call("/", Options::new()).await.unwrap();
    }

    #[tokio::test]
    async fn short_circuiting_skips_the_transport() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counting = {
            let calls = Arc::clone(&calls);
            Fetch::new(move |_address, _options| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Response::ok())
                }
            })
        };

        let stack = Stack::new().push(|_next: Next, _address: String, _options: Options| async {
            Ok(Response::new(http::StatusCode::NO_CONTENT))
        });

        let response = stack.bind(counting).call("/", Options::new()).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stacks_nest_as_middleware() {
        let inner = Stack::new().push(push_marker(2)).push(push_marker(3));
        let stack = Stack::new()
            .push(push_marker(1))
            .push(inner)
            .push(push_marker(4));

        let response = stack.bind(echo()).call("/", Options::new()).await.unwrap();
        let options = response.extension("options").unwrap();
        assert_eq!(options["extensions"]["pushed"], json!([1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn stacks_collect_from_boxed_middleware() {
        let layers: Vec<BoxedMiddleware> =
            vec![Arc::new(push_marker(1)), Arc::new(push_marker(2))];
        let stack: Stack = layers.into_iter().collect();

        let response = stack.bind(echo()).call("/", Options::new()).await.unwrap();
        let options = response.extension("options").unwrap();
        assert_eq!(options["extensions"]["pushed"], json!([1, 2]));
    }
}
