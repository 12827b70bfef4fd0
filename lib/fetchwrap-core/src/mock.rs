//! Test doubles carried by [`FetchOptions`].

use std::fmt;
use std::sync::Arc;

use crate::{FetchOptions, Reply};

type SpyFn = dyn Fn(&str, &FetchOptions) + Send + Sync;
type MockFn = dyn Fn(&str, &FetchOptions) -> Reply + Send + Sync;

/// Callback observing every request seen by the testing middleware.
#[derive(Clone)]
pub struct Spy(Arc<SpyFn>);

impl Spy {
    /// Wrap a callback.
    pub fn new(f: impl Fn(&str, &FetchOptions) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, url: &str, options: &FetchOptions) {
        (self.0)(url, options);
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Spy(..)")
    }
}

/// Two spies are equal when they share the same callback.
impl PartialEq for Spy {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Canned reply for the testing middleware.
#[derive(Clone)]
pub enum Mock {
    /// Always reply with this value.
    Value(Reply),
    /// Compute the reply from the request.
    Fn(Arc<MockFn>),
}

impl Mock {
    /// A mock replying with a fixed value.
    pub fn value(reply: impl Into<Reply>) -> Self {
        Self::Value(reply.into())
    }

    /// A mock computing its reply from the request.
    pub fn from_fn(f: impl Fn(&str, &FetchOptions) -> Reply + Send + Sync + 'static) -> Self {
        Self::Fn(Arc::new(f))
    }

    /// Produce the reply for a request.
    #[must_use]
    pub fn resolve(&self, url: &str, options: &FetchOptions) -> Reply {
        match self {
            Self::Value(reply) => reply.clone(),
            Self::Fn(f) => f(url, options),
        }
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(reply) => f.debug_tuple("Value").field(reply).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl PartialEq for Mock {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Fn(a), Self::Fn(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
