//! URL templating and query string building.
//!
//! A URL template contains `{name}` tokens. Tokens are filled from the
//! caller's params first, then from defaults. Caller params that were not
//! used by a token become query parameters; defaults never do.

use std::collections::HashSet;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;

use crate::{Error, Params, Result};

/// Characters escaped in query keys and values: everything but
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[allow(clippy::expect_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("token pattern is valid"));

/// Resolve `{token}`s of `url` and append unused caller params as a query string.
///
/// `null` params count as absent. When both param sets are empty the URL is
/// returned untouched, tokens included.
///
/// # Errors
///
/// Returns [`Error::MissingUrlParam`] with the literal token when a token has
/// no value and `fail_if_missing` is set.
///
/// # Example
///
/// ```
/// use fetchwrap_core::{Params, resolve_url};
/// use serde_json::json;
///
/// let mut defaults = Params::new();
/// defaults.insert("id".into(), json!(57));
/// let mut params = Params::new();
/// params.insert("section".into(), json!("notifications"));
/// params.insert("email".into(), json!("john@smith.com"));
///
/// let url = resolve_url("http://localhost/users/{id}/{section}", &params, &defaults, true)
///     .expect("resolved");
/// assert_eq!(url, "http://localhost/users/57/notifications?email=john%40smith.com");
/// ```
pub fn resolve_url(
    url: &str,
    params: &Params,
    defaults: &Params,
    fail_if_missing: bool,
) -> Result<String> {
    if params.is_empty() && defaults.is_empty() {
        return Ok(url.to_string());
    }

    let mut consumed = HashSet::new();
    let mut resolved = String::with_capacity(url.len());
    let mut last = 0;

    for captures in TOKEN.captures_iter(url) {
        let (Some(token), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        resolved.push_str(url.get(last..token.start()).unwrap_or_default());
        last = token.end();

        let name = name.as_str();
        let value = match present(params, name) {
            Some(value) => {
                consumed.insert(name);
                Some(value)
            }
            None => present(defaults, name),
        };

        match value {
            Some(value) => resolved.push_str(&render(value)),
            None if fail_if_missing => return Err(Error::missing_url_param(token.as_str())),
            None => resolved.push_str(token.as_str()),
        }
    }
    resolved.push_str(url.get(last..).unwrap_or_default());

    let query = params
        .iter()
        .filter(|(name, _)| !consumed.contains(name.as_str()))
        .filter_map(|(name, value)| encode_query_param(name, value))
        .collect::<Vec<_>>()
        .join("&");

    if !query.is_empty() {
        resolved.push(if resolved.contains('?') { '&' } else { '?' });
        resolved.push_str(&query);
    }
    Ok(resolved)
}

/// Encode one query parameter, repeating the key for arrays.
///
/// Returns `None` when nothing is left to encode (`null`, or an array of nulls).
#[must_use]
pub fn encode_query_param(name: &str, value: &Value) -> Option<String> {
    let name = encode_component(name);
    let pairs: Vec<String> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| format!("{name}={}", encode_component(&render(item))))
            .collect(),
        other => vec![format!("{name}={}", encode_component(&render(other)))],
    };
    (!pairs.is_empty()).then(|| pairs.join("&"))
}

fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

fn present<'a>(params: &'a Params, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|value| !value.is_null())
}

/// Text form of a param value: strings verbatim, arrays comma-joined,
/// objects as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
    }
}
