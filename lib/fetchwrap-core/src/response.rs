//! Fetch results.
//!
//! The base fetch produces a [`Response`]. Middlewares may turn it into another
//! [`Reply`] shape, e.g. a parsed JSON document.
//!
//! # Example
//!
//! ```ignore
//! let user: User = reply.deserialize()?;
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Json, Result};

// ============================================================================
// Raw Response
// ============================================================================

/// Raw HTTP response with status, headers, and a buffered body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    status_text: String,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    ///
    /// The status text defaults to the canonical reason phrase of `status`.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            headers,
            body: body.into(),
        }
    }

    /// Replace the status text.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// HTTP status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Response body as text, invalid UTF-8 sequences replaced.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, Bytes) {
        (self.status, self.headers, self.body)
    }
}

// ============================================================================
// Reply
// ============================================================================

/// What a composed fetch resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The raw response of the base fetch.
    Response(Response),
    /// A parsed (and revived) JSON document.
    Json(Json),
    /// A text body.
    Text(String),
    /// A JSON response without a body.
    Empty,
}

impl Reply {
    /// The raw response, if this reply is one.
    #[must_use]
    pub fn as_response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }

    /// The JSON document, if this reply is one.
    #[must_use]
    pub fn as_json(&self) -> Option<&Json> {
        match self {
            Self::Json(json) => Some(json),
            _ => None,
        }
    }

    /// The text body, if this reply is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`Reply::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Decode the reply into a typed value.
    ///
    /// Text and raw response bodies are parsed as JSON first. Revived datetimes
    /// are handed to `T` as ISO-8601 strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] with the path of the failing field.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Response(response) => crate::from_json(response.body()),
            Self::Text(text) => crate::from_json(text.as_bytes()),
            Self::Json(json) => {
                serde_path_to_error::deserialize(serde_json::Value::from(json.clone())).map_err(
                    |e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()),
                )
            }
            Self::Empty => serde_path_to_error::deserialize(serde_json::Value::Null).map_err(|e| {
                Error::json_deserialization(e.path().to_string(), e.inner().to_string())
            }),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<Json> for Reply {
    fn from(json: Json) -> Self {
        Self::Json(json)
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(Json::from(value))
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
