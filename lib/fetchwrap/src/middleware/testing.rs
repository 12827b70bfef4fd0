//! Test doubles for composed fetches.

use tracing::debug;

use crate::{Error, FetchFuture, FetchOptions, Middleware, Mock, Next, Spy};

/// Middleware answering requests with mocks.
///
/// For each request:
///
/// 1. the spy, if any, is called with the URL and options;
/// 2. a mock, if any, answers the request without calling `next`;
/// 3. otherwise the request fails with [`Error::MockNotFound`], or goes on
///    to `next` when [`Testing::fail_if_no_mock`] is disabled.
///
/// A spy or mock set on the request options replaces the configured one.
///
/// # Example
///
/// ```
/// use fetchwrap::Mock;
/// use fetchwrap::middleware::Testing;
///
/// let testing = Testing::new().with_mock(Mock::value(serde_json::json!({ "id": 57 })));
/// ```
#[derive(Debug, Clone)]
pub struct Testing {
    spy: Option<Spy>,
    mock: Option<Mock>,
    fail_if_no_mock: bool,
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            spy: None,
            mock: None,
            fail_if_no_mock: true,
        }
    }
}

impl Testing {
    /// No spy, no mock, unmocked requests fail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `spy` for each request.
    #[must_use]
    pub fn with_spy(mut self, spy: Spy) -> Self {
        self.spy = Some(spy);
        self
    }

    /// Answer requests with `mock`.
    #[must_use]
    pub fn with_mock(mut self, mock: Mock) -> Self {
        self.mock = Some(mock);
        self
    }

    /// Whether unmocked requests fail instead of reaching `next`.
    #[must_use]
    pub const fn fail_if_no_mock(mut self, fail: bool) -> Self {
        self.fail_if_no_mock = fail;
        self
    }
}

impl Middleware for Testing {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        if let Some(spy) = options.spy().or(self.spy.as_ref()) {
            spy.call(&url, &options);
        }

        if let Some(mock) = options.mock().or(self.mock.as_ref()) {
            debug!(url, "answering with mock");
            let reply = mock.resolve(&url, &options);
            return Box::pin(async move { Ok(reply) });
        }

        if self.fail_if_no_mock {
            return Box::pin(async move { Err(Error::mock_not_found(url)) });
        }
        next.run(url, options)
    }
}
