//! URL templating middleware.

use crate::{FetchFuture, FetchOptions, Middleware, Next, Params, resolve_url};

/// Middleware filling `{token}`s in the request URL.
///
/// Tokens are looked up in `options.params`, then in the defaults given at
/// construction. Request params that no token used are appended as a query
/// string. See [`resolve_url`] for the exact rules.
///
/// # Example
///
/// ```
/// use fetchwrap::Params;
/// use fetchwrap::middleware::UrlParams;
///
/// let mut defaults = Params::new();
/// defaults.insert("version".into(), "v2".into());
/// let params = UrlParams::new(defaults).fail_if_token_is_missing(false);
/// ```
#[derive(Debug, Clone)]
pub struct UrlParams {
    defaults: Params,
    fail_if_missing: bool,
}

impl Default for UrlParams {
    fn default() -> Self {
        Self::new(Params::new())
    }
}

impl UrlParams {
    /// Resolve with these default params, failing on unresolved tokens.
    #[must_use]
    pub fn new(defaults: Params) -> Self {
        Self {
            defaults,
            fail_if_missing: true,
        }
    }

    /// Whether an unresolved token fails the request. When `false` the token
    /// stays in the URL as written.
    #[must_use]
    pub const fn fail_if_token_is_missing(mut self, fail: bool) -> Self {
        self.fail_if_missing = fail;
        self
    }
}

impl Middleware for UrlParams {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        match resolve_url(&url, options.params(), &self.defaults, self.fail_if_missing) {
            Ok(resolved) => next.run(resolved, options),
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }
}
