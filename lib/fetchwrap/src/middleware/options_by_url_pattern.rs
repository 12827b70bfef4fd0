//! Default options keyed by URL pattern.

use tracing::trace;

use crate::{FetchFuture, FetchOptions, Merge, Middleware, Next, Result, UrlPattern};

/// Middleware merging default options into requests whose URL matches.
///
/// Rules are checked in the order they were added. Each matching rule is
/// merged beneath what has accumulated so far, so the caller's own options
/// always win and an earlier rule wins over a later one.
///
/// # Example
///
/// ```
/// use fetchwrap::FetchOptions;
/// use fetchwrap::middleware::OptionsByUrlPattern;
///
/// let auth = OptionsByUrlPattern::new()
///     .try_with_pattern(
///         "https://*.example.com/*",
///         FetchOptions::new().with_header("Authorization", "Token s3cr3tt0k3n"),
///     )
///     .expect("valid pattern");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionsByUrlPattern {
    rules: Vec<(UrlPattern, FetchOptions)>,
}

impl OptionsByUrlPattern {
    /// No rules yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule.
    #[must_use]
    pub fn with_rule(mut self, pattern: UrlPattern, options: FetchOptions) -> Self {
        self.rules.push((pattern, options));
        self
    }

    /// Add a rule, compiling `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) if the
    /// pattern does not compile.
    pub fn try_with_pattern(self, pattern: &str, options: FetchOptions) -> Result<Self> {
        Ok(self.with_rule(UrlPattern::new(pattern)?, options))
    }

    /// The options a request to `url` would be sent with.
    #[must_use]
    pub fn apply(&self, url: &str, options: &FetchOptions) -> FetchOptions {
        self.rules
            .iter()
            .filter(|(pattern, _)| pattern.matches(url))
            .fold(options.clone(), |patched, (pattern, defaults)| {
                trace!(%pattern, url, "url pattern matched");
                defaults.merged(&patched)
            })
    }
}

impl Middleware for OptionsByUrlPattern {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        let patched = self.apply(&url, &options);
        next.run(url, patched)
    }
}
