//! Core types and traits for fetchwrap.
//!
//! This crate provides the foundational types used by fetchwrap:
//! - [`Fetch`], [`Middleware`] and [`Next`] - The fetch function and its wrappers
//! - [`FetchOptions`] and [`FetchRequest`] - Request options
//! - [`Response`] and [`Reply`] - What a fetch resolves to
//! - [`Json`] - JSON documents with revived datetimes
//! - [`Merge`] - Deep merging of options
//! - [`resolve_url`] - URL templating and query building
//! - [`UrlPattern`] - `*` wildcard URL patterns
//! - [`Spy`] and [`Mock`] - Test doubles carried by options
//! - [`Error`] and [`Result`] - Error handling

mod error;
mod fetch;
mod json;
mod merge;
mod method;
mod mock;
mod options;
mod pattern;
pub mod prelude;
mod request;
mod response;
mod url_template;

pub use error::{Error, Result};
pub use fetch::{
    Fetch, FetchExt, FetchFuture, FnFetch, FnMiddleware, Middleware, Next, fetch_fn,
    middleware_fn,
};
pub use json::{JSON_CONTENT_TYPE, Json, from_json, parse_revived, revive};
pub use merge::{Merge, merge_all, merge_json};
pub use method::Method;
pub use mock::{Mock, Spy};
pub use options::{Body, FetchOptions, Params};
pub use pattern::UrlPattern;
pub use request::FetchRequest;
pub use response::{Reply, Response};
pub use url_template::{encode_query_param, resolve_url};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
