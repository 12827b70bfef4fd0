//! Deep merging of option structures.
//!
//! Sources combine left to right: a later source overrides an earlier one.
//! Nested objects present on both sides merge key by key; any other value
//! (strings, numbers, arrays, bodies) is replaced wholesale. Inputs are never
//! modified, the merged value is always freshly allocated.

use std::collections::HashMap;
use std::hash::Hash;

use serde_json::{Map, Value};

/// Types that can be deep-merged.
pub trait Merge {
    /// Merge `overlay` on top of `self`, returning a new value.
    #[must_use]
    fn merged(&self, overlay: &Self) -> Self;
}

impl Merge for Value {
    fn merged(&self, overlay: &Self) -> Self {
        match (self, overlay) {
            (Self::Object(base), Self::Object(over)) => Self::Object(base.merged(over)),
            (_, over) => over.clone(),
        }
    }
}

impl Merge for Map<String, Value> {
    fn merged(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in overlay {
            let value = match merged.get(key) {
                Some(existing) => existing.merged(value),
                None => value.clone(),
            };
            merged.insert(key.clone(), value);
        }
        merged
    }
}

impl<K, V> Merge for HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn merged(&self, overlay: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

/// Deep-merge two JSON values, `b` on top of `a`.
///
/// ```
/// use fetchwrap_core::merge_json;
/// use serde_json::json;
///
/// let merged = merge_json(&json!({ "a": { "x": 1 } }), &json!({ "a": { "y": 2 } }));
/// assert_eq!(merged, json!({ "a": { "x": 1, "y": 2 } }));
/// ```
#[must_use]
pub fn merge_json(a: &Value, b: &Value) -> Value {
    a.merged(b)
}

/// Merge every source in order into a fresh value.
///
/// # Example
///
/// ```
/// use fetchwrap_core::{FetchOptions, merge_all};
///
/// let defaults = FetchOptions::new().with_header("Accept", "text/plain");
/// let caller = FetchOptions::new().with_header("Accept", "application/json");
///
/// let merged = merge_all([&defaults, &caller]);
/// assert_eq!(merged.header("Accept"), Some("application/json"));
/// ```
pub fn merge_all<'a, T>(sources: impl IntoIterator<Item = &'a T>) -> T
where
    T: Merge + Default + 'a,
{
    sources
        .into_iter()
        .fold(T::default(), |merged, source| merged.merged(source))
}
