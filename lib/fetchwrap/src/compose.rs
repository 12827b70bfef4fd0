//! Middleware composition.
//!
//! A composed fetch is an onion: the first middleware listed is the outermost
//! layer. It sees the request first and the reply (or error) last.
//!
//! ```text
//!   request ──▶ m1 ──▶ m2 ──▶ m3 ──▶ base
//!   reply   ◀── m1 ◀── m2 ◀── m3 ◀──
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use tower_service::Service;

use crate::{Error, Fetch, FetchFuture, FetchOptions, FetchRequest, Middleware, Next, Reply, Result};

/// One middleware with the rest of the chain behind it.
struct Layered {
    middleware: Arc<dyn Middleware>,
    next: Next,
}

impl Fetch for Layered {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        self.middleware.handle(url, options, self.next.clone())
    }
}

/// Wrap `base` in `middlewares`, first element outermost.
///
/// Handlers are not inspected; an empty list yields a fetch that behaves
/// exactly like `base`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use fetchwrap::middleware::{Logger, SendJson};
/// use fetchwrap::{FetchOptions, Middleware, Reply, compose, fetch_fn};
///
/// let base = fetch_fn(|_url: String, _options: FetchOptions| async { Ok(Reply::Empty) });
/// let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(Logger::new()), Arc::new(SendJson)];
/// let fetch = compose(base, middlewares);
/// assert_eq!(fetch.layers(), 2);
/// ```
pub fn compose<F>(base: F, middlewares: Vec<Arc<dyn Middleware>>) -> FetchWrap
where
    F: Fetch,
{
    let layers = middlewares.len();
    let chain = middlewares
        .into_iter()
        .rev()
        .fold(Next::new(Arc::new(base)), |next, middleware| {
            Next::new(Arc::new(Layered { middleware, next }))
        });
    FetchWrap { chain, layers }
}

/// A fetch wrapped in middlewares.
///
/// Cloning is cheap: clones share the same chain.
///
/// # Example
///
/// ```ignore
/// use fetchwrap::middleware::{ReceiveJson, SendJson, UrlParams};
/// use fetchwrap::{FetchOptions, FetchWrap, HyperFetch};
///
/// let fetch = FetchWrap::builder(HyperFetch::new())
///     .with(UrlParams::new(Default::default()))
///     .with(SendJson)
///     .with(ReceiveJson::new())
///     .build();
///
/// let reply = fetch
///     .fetch("https://api.example.com/users/{id}", FetchOptions::new().with_param("id", 57))
///     .await?;
/// ```
#[derive(Clone)]
pub struct FetchWrap {
    chain: Next,
    layers: usize,
}

impl std::fmt::Debug for FetchWrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchWrap")
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}

impl FetchWrap {
    /// Start composing around `base`.
    #[must_use]
    pub fn builder<F: Fetch>(base: F) -> FetchWrapBuilder {
        FetchWrapBuilder {
            base: Arc::new(base),
            middlewares: Vec::new(),
        }
    }

    /// Run a request through the whole chain.
    pub fn fetch(&self, url: impl Into<String>, options: FetchOptions) -> FetchFuture {
        self.chain.run(url.into(), options)
    }

    /// Run a request with empty options.
    pub fn get(&self, url: impl Into<String>) -> FetchFuture {
        self.fetch(url, FetchOptions::new())
    }

    /// Number of middlewares around the base fetch.
    #[must_use]
    pub const fn layers(&self) -> usize {
        self.layers
    }
}

impl Fetch for FetchWrap {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        self.chain.run(url, options)
    }
}

impl Service<FetchRequest> for FetchWrap {
    type Response = Reply;
    type Error = Error;
    type Future = FetchFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: FetchRequest) -> Self::Future {
        let (url, options) = request.into_parts();
        self.chain.run(url, options)
    }
}

/// Builder for [`FetchWrap`].
///
/// Middlewares are applied in order: first added = outermost (processes
/// requests first).
pub struct FetchWrapBuilder {
    base: Arc<dyn Fetch>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for FetchWrapBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchWrapBuilder")
            .field("layers_count", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

impl FetchWrapBuilder {
    /// Add a middleware inside the ones already added.
    #[must_use]
    pub fn with<M: Middleware>(self, middleware: M) -> Self {
        self.with_arc(Arc::new(middleware))
    }

    /// Add a shared middleware.
    #[must_use]
    pub fn with_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Build the composed fetch.
    #[must_use]
    pub fn build(self) -> FetchWrap {
        compose(self.base, self.middlewares)
    }
}
