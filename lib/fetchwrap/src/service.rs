//! Tower interop.
//!
//! [`ServiceFetch`] lets any `tower::Service<FetchRequest>` act as the base
//! fetch of a composition. The composed [`FetchWrap`](crate::FetchWrap) is a
//! service itself, so tower layers can go on either side of the chain.

use std::sync::{Arc, Mutex};

use tower::ServiceExt;
use tower_service::Service;

use crate::{Error, Fetch, FetchFuture, FetchOptions, FetchRequest, Reply};

/// A tower service used as a base fetch.
///
/// Each call clones the service out of a lock and drives the clone, so the
/// lock is never held across an await.
///
/// # Example
///
/// ```ignore
/// use fetchwrap::{FetchWrap, ServiceFetch};
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .concurrency_limit(8)
///     .service(HyperFetch::new());
/// let fetch = FetchWrap::builder(ServiceFetch::new(service)).build();
/// ```
pub struct ServiceFetch<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> ServiceFetch<S> {
    /// Wrap a service.
    pub fn new(service: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }
}

impl<S> Clone for ServiceFetch<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for ServiceFetch<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFetch").finish_non_exhaustive()
    }
}

impl<S> Fetch for ServiceFetch<S>
where
    S: Service<FetchRequest, Response = Reply, Error = Error> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    fn fetch(&self, url: String, options: FetchOptions) -> FetchFuture {
        // Lock, clone the service, and release the lock immediately
        let service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(service.oneshot(FetchRequest::new(url, options)))
    }
}
