//! Composable middleware for fetch-style HTTP clients.
//!
//! A base fetch turns a URL and [`FetchOptions`] into a [`Reply`]. Middlewares
//! wrap it, each adding one behavior: logging, URL templating, JSON encoding
//! and decoding, default options by URL, test mocks. The first middleware
//! listed is the outermost one.
//!
//! # Example
//!
//! ```ignore
//! use fetchwrap::middleware::{Logger, ReceiveJson, SendJson, UrlParams};
//! use fetchwrap::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let fetch = FetchWrap::builder(HyperFetch::new())
//!     .with(Logger::new())
//!     .with(UrlParams::default())
//!     .with(SendJson)
//!     .with(ReceiveJson::new().accept_header(true))
//!     .build();
//!
//! let user: User = fetch
//!     .fetch_as(
//!         "https://api.example.com/users/{id}",
//!         FetchOptions::new().with_param("id", 42),
//!     )
//!     .await?;
//! ```

mod client;
mod compose;
mod connector;
pub mod middleware;
pub mod prelude;
mod service;

// Re-export client and composition types
pub use client::{ClientConfig, HyperFetch, HyperFetchBuilder};
pub use compose::{FetchWrap, FetchWrapBuilder, compose};
pub use service::ServiceFetch;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use fetchwrap_core::{
    Body, Error, Fetch, FetchExt, FetchFuture, FetchOptions, FetchRequest, FnFetch, FnMiddleware,
    JSON_CONTENT_TYPE, Json, Merge, Method, Middleware, Mock, Next, Params, Reply, Response,
    Result, Spy, UrlPattern, encode_query_param, fetch_fn, from_json, merge_all, middleware_fn,
    merge_json, parse_revived, resolve_url, revive,
};

// Re-export http types for status codes and headers
pub use fetchwrap_core::{StatusCode, header};
