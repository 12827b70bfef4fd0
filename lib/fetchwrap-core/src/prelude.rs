//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use fetchwrap_core::prelude::*;
//! ```

pub use crate::{
    Body, Error, Fetch, FetchExt, FetchFuture, FetchOptions, FetchRequest, Json, Merge, Method,
    Middleware, Mock, Next, Reply, Response, Result, Spy, UrlPattern, fetch_fn, merge_all,
    middleware_fn, resolve_url,
};
