//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use fetchwrap::prelude::*;
//! ```

pub use crate::{
    Body, ClientConfig, Error, Fetch, FetchExt, FetchOptions, FetchRequest, FetchWrap, HyperFetch,
    Json, Merge, Method, Middleware, Mock, Next, Reply, Response, Result, Spy, UrlPattern,
    compose, fetch_fn, middleware_fn,
};
pub use serde::{Deserialize, Serialize};
