//! URL patterns with `*` wildcards.
//!
//! A pattern is either the single wildcard `*` (matches every URL), a plain
//! string compared for equality, or a string containing `*` wildcards that
//! stand for any sequence of characters, including none. Wildcard patterns
//! are matched anywhere in the URL; all other characters are literal.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::{Error, Result};

#[derive(Debug, Clone)]
enum Kind {
    Any,
    Exact,
    Wildcard(Regex),
}

/// A compiled URL pattern.
///
/// # Example
///
/// ```
/// use fetchwrap_core::UrlPattern;
///
/// let pattern = UrlPattern::new("http://localhost/users/*").expect("valid pattern");
/// assert!(pattern.matches("http://localhost/users/57"));
/// assert!(!pattern.matches("http://localhost/groups/1"));
/// ```
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    kind: Kind,
}

impl UrlPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the derived expression cannot be built.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let kind = if source == "*" {
            Kind::Any
        } else if source.contains('*') {
            let expression = source
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            Kind::Wildcard(Regex::new(&expression)?)
        } else {
            Kind::Exact
        };
        Ok(Self { source, kind })
    }

    /// Whether `url` matches this pattern.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        if url == self.source {
            return true;
        }
        match &self.kind {
            Kind::Any => true,
            Kind::Exact => false,
            Kind::Wildcard(regex) => regex.is_match(url),
        }
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for UrlPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for UrlPattern {}
