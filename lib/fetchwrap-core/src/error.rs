//! Error types for fetchwrap.

use derive_more::{Display, Error, From};

use crate::Response;

/// Main error type for fetchwrap operations.
///
/// Every failure of a composed fetch surfaces as one of these variants.
/// Errors coming from the base fetch pass through the middleware stack
/// untouched.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A `{token}` in the URL template had no value.
    #[display("url param not found: {token}")]
    #[from(skip)]
    MissingUrlParam {
        /// The literal unresolved token, braces included (e.g. `{section}`).
        #[error(not(source))]
        token: String,
    },

    /// A response was received but its status is not successful.
    #[display("http error {status}: {status_text}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// HTTP status text.
        status_text: String,
        /// The raw response.
        #[error(not(source))]
        response: Box<Response>,
    },

    /// The response declared a JSON content type but its body does not parse.
    #[display("{_0}")]
    #[from]
    JsonParse(serde_json::Error),

    /// A request body could not be serialized to JSON.
    #[display("JSON serialization error: {_0}")]
    #[from(skip)]
    JsonSerialization(serde_json::Error),

    /// A reply could not be decoded into the requested type.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The testing middleware has no mock for this request.
    #[display("[fetch] request mock not found for: {url}")]
    #[from(skip)]
    MockNotFound {
        /// The unmatched request URL.
        #[error(not(source))]
        url: String,
    },

    /// A URL pattern could not be compiled.
    #[display("invalid url pattern: {_0}")]
    #[from]
    InvalidPattern(regex::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing URL param error for the given token.
    #[must_use]
    pub fn missing_url_param(token: impl Into<String>) -> Self {
        Self::MissingUrlParam {
            token: token.into(),
        }
    }

    /// Create an HTTP error from an unsuccessful response.
    #[must_use]
    pub fn http(response: Response) -> Self {
        Self::Http {
            status: response.status(),
            status_text: response.status_text().to_string(),
            response: Box::new(response),
        }
    }

    /// Create a mock-not-found error for the given URL.
    #[must_use]
    pub fn mock_not_found(url: impl Into<String>) -> Self {
        Self::MockNotFound { url: url.into() }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// The raw response behind an HTTP error.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Http { response, .. } => Some(response.as_ref()),
            _ => None,
        }
    }
}
