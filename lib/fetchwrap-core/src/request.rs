//! A fetch call as a single value.
//!
//! [`FetchRequest`] pairs a URL with its [`FetchOptions`], so that a fetch
//! can travel through APIs that take one request argument, such as a
//! `tower::Service`.
//!
//! # Example
//!
//! ```
//! use fetchwrap_core::{FetchOptions, FetchRequest, Method};
//!
//! let request = FetchRequest::new(
//!     "http://localhost/users",
//!     FetchOptions::new().with_method(Method::Post),
//! );
//! assert_eq!(request.url(), "http://localhost/users");
//! ```

use crate::FetchOptions;

/// A URL with the options of a single fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchRequest {
    url: String,
    options: FetchOptions,
}

impl FetchRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(url: impl Into<String>, options: FetchOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    /// Request URL, possibly still templated.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request options.
    #[must_use]
    pub const fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Consume into (url, options).
    #[must_use]
    pub fn into_parts(self) -> (String, FetchOptions) {
        (self.url, self.options)
    }
}

impl From<&str> for FetchRequest {
    fn from(url: &str) -> Self {
        Self::new(url, FetchOptions::new())
    }
}

impl From<String> for FetchRequest {
    fn from(url: String) -> Self {
        Self::new(url, FetchOptions::new())
    }
}

impl<U: Into<String>> From<(U, FetchOptions)> for FetchRequest {
    fn from((url, options): (U, FetchOptions)) -> Self {
        Self::new(url, options)
    }
}
