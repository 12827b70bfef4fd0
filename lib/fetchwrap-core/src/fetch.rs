//! Fetch and middleware traits.
//!
//! - [`Fetch`] - Anything that turns a URL and options into a [`Reply`]
//! - [`Middleware`] - A wrapper around the rest of a chain, reached through [`Next`]
//!
//! Closures implement both traits through [`fetch_fn`] and [`middleware_fn`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{FetchOptions, Reply, Result};

/// Boxed future returned by [`Fetch::fetch`] and [`Middleware::handle`].
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Reply>> + Send + 'static>>;

/// A fetch function: one request in, one reply out.
///
/// Implementations must not modify shared state visible to other calls
/// except through explicit side channels (spies, loggers).
pub trait Fetch: Send + Sync + 'static {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// The returned future fails with whatever error the implementation or
    /// any wrapped layer produces. Errors are never swallowed by the chain.
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture;
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        (**self).fetch(url, options)
    }
}

impl<T: Fetch + ?Sized> Fetch for Box<T> {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        (**self).fetch(url, options)
    }
}

/// Extension trait for [`Fetch`] with convenience methods.
pub trait FetchExt: Fetch {
    /// Fetch with empty options.
    fn get(&self, url: impl Into<String>) -> FetchFuture {
        self.fetch(url.into(), FetchOptions::new())
    }

    /// Fetch and decode the reply into `T`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`Error::JsonDeserialization`](crate::Error::JsonDeserialization)
    /// if the reply does not have the shape of `T`.
    fn fetch_as<T: DeserializeOwned + Send>(
        &self,
        url: impl Into<String>,
        options: FetchOptions,
    ) -> impl Future<Output = Result<T>> + Send {
        let reply = self.fetch(url.into(), options);
        async move { reply.await?.deserialize() }
    }
}

impl<T: Fetch + ?Sized> FetchExt for T {}

/// The remainder of a middleware chain.
///
/// Calling [`Next::run`] hands the request to the next middleware, or to the
/// base fetch when this is the innermost layer. A middleware may call it
/// zero, one or several times.
#[derive(Clone)]
pub struct Next(Arc<dyn Fetch>);

impl Next {
    /// Wrap a fetch as the continuation of a chain.
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self(fetch)
    }

    /// Continue the chain.
    #[must_use]
    pub fn run(&self, url: String, options: FetchOptions) -> FetchFuture {
        self.0.fetch(url, options)
    }
}

impl Fetch for Next {
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        self.run(url, options)
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next(..)")
    }
}

/// A middleware: receives a request and the rest of the chain.
///
/// # Example
///
/// ```
/// use fetchwrap_core::{FetchFuture, FetchOptions, Middleware, Next};
///
/// struct AcceptJson;
///
/// impl Middleware for AcceptJson {
///     fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
///         next.run(url, options.with_header("Accept", "application/json"))
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Handle one request.
    ///
    /// # Errors
    ///
    /// The returned future fails with the middleware's own error or with an
    /// error propagated from `next`.
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture;
}

impl<T: Middleware + ?Sized> Middleware for Arc<T> {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        (**self).handle(url, options, next)
    }
}

impl<T: Middleware + ?Sized> Middleware for Box<T> {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        (**self).handle(url, options, next)
    }
}

/// A [`Fetch`] backed by a closure. Built with [`fetch_fn`].
#[derive(Clone)]
pub struct FnFetch<F>(F);

impl<F, Fut> Fetch for FnFetch<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        Box::pin((self.0)(url, options))
    }
}

impl<F> fmt::Debug for FnFetch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnFetch(..)")
    }
}

/// Use an async closure as a fetch.
///
/// # Example
///
/// ```
/// use fetchwrap_core::{FetchOptions, Reply, fetch_fn};
///
/// let fetch = fetch_fn(|url: String, _options: FetchOptions| async move {
///     Ok(Reply::Text(format!("fetched {url}")))
/// });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FnFetch<F>
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    FnFetch(f)
}

/// A [`Middleware`] backed by a closure. Built with [`middleware_fn`].
#[derive(Clone)]
pub struct FnMiddleware<F>(F);

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(String, FetchOptions, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        Box::pin((self.0)(url, options, next))
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMiddleware(..)")
    }
}

/// Use an async closure as a middleware.
///
/// # Example
///
/// ```
/// use fetchwrap_core::{FetchOptions, Next, middleware_fn};
///
/// let retry_once = middleware_fn(|url: String, options: FetchOptions, next: Next| async move {
///     match next.run(url.clone(), options.clone()).await {
///         Ok(reply) => Ok(reply),
///         Err(_) => next.run(url, options).await,
///     }
/// });
/// ```
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(String, FetchOptions, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply>> + Send + 'static,
{
    FnMiddleware(f)
}
