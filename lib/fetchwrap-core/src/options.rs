//! Request options.
//!
//! [`FetchOptions`] is the options structure handed to every middleware and
//! finally to the base fetch. Middlewares never modify the options they
//! receive; they derive new ones with [`Merge::merged`](crate::Merge::merged).
//!
//! # Example
//!
//! ```
//! use fetchwrap_core::{FetchOptions, Method};
//!
//! let options = FetchOptions::new()
//!     .with_method(Method::Put)
//!     .with_header("Accept", "application/json")
//!     .with_param("page", 1);
//!
//! assert_eq!(options.method_or_default(), Method::Put);
//! assert_eq!(options.header("Accept"), Some("application/json"));
//! ```

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{Json, Merge, Method, Mock, Spy};

/// URL template parameters, in insertion order.
pub type Params = Map<String, Value>;

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A body sent as-is.
    Text(String),
    /// A structured body, serialized to JSON before sending.
    Json(Json),
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Json> for Body {
    fn from(json: Json) -> Self {
        Self::Json(json)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(Json::from(value))
    }
}

/// Options of a single fetch call.
///
/// Unknown keys live in [`FetchOptions::extra`] and are merged like any
/// other nested structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    method: Option<Method>,
    headers: HashMap<String, String>,
    body: Option<Body>,
    params: Params,
    spy: Option<Spy>,
    mock: Option<Mock>,
    extra: Map<String, Value>,
}

impl FetchOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set a header, replacing any value under the same name in any case.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Set multiple headers.
    #[must_use]
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            set_header(&mut self.headers, name, value);
        }
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a structured body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub fn with_json<T: serde::Serialize>(self, value: &T) -> crate::Result<Self> {
        let value = serde_json::to_value(value).map_err(crate::Error::JsonSerialization)?;
        Ok(self.with_body(value))
    }

    /// Set a URL template parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set multiple URL template parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params.extend(params);
        self
    }

    /// Attach a per-call spy.
    #[must_use]
    pub fn with_spy(mut self, spy: Spy) -> Self {
        self.spy = Some(spy);
        self
    }

    /// Attach a per-call mock.
    #[must_use]
    pub fn with_mock(mut self, mock: Mock) -> Self {
        self.mock = Some(mock);
        self
    }

    /// Set an arbitrary extra option.
    #[must_use]
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// HTTP method, if set.
    #[must_use]
    pub const fn method(&self) -> Option<Method> {
        self.method
    }

    /// HTTP method, `GET` when unset.
    #[must_use]
    pub fn method_or_default(&self) -> Method {
        self.method.unwrap_or_default()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value, name matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// URL template parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Per-call spy.
    #[must_use]
    pub const fn spy(&self) -> Option<&Spy> {
        self.spy.as_ref()
    }

    /// Per-call mock.
    #[must_use]
    pub const fn mock(&self) -> Option<&Mock> {
        self.mock.as_ref()
    }

    /// Extra options.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Header names are case-insensitive: the new spelling replaces the old one.
fn set_header(headers: &mut HashMap<String, String>, name: String, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
    headers.insert(name, value);
}

impl Merge for FetchOptions {
    fn merged(&self, overlay: &Self) -> Self {
        let mut headers = self.headers.clone();
        for (name, value) in &overlay.headers {
            set_header(&mut headers, name.clone(), value.clone());
        }

        Self {
            method: overlay.method.or(self.method),
            headers,
            body: overlay.body.clone().or_else(|| self.body.clone()),
            params: self.params.merged(&overlay.params),
            spy: overlay.spy.clone().or_else(|| self.spy.clone()),
            mock: overlay.mock.clone().or_else(|| self.mock.clone()),
            extra: self.extra.merged(&overlay.extra),
        }
    }
}
