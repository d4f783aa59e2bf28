//! Request Key Module
//!
//! Derives stable cache keys from a resource identifier and its parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

// == Request Params ==
/// Parameter set attached to a request.
///
/// Fields are kept sorted by name, so two parameter sets holding the same
/// pairs always serialize identically regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestParams {
    fields: BTreeMap<String, Value>,
}

impl RequestParams {
    // == Constructor ==
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds (or replaces) a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    // == From Serializable ==
    /// Builds a parameter set from any value serializing to a JSON object.
    ///
    /// `null` (e.g. `()` or `None`) yields an empty set. Anything else that is
    /// not an object is rejected.
    pub fn from_serializable<S: Serialize>(params: &S) -> serde_json::Result<Self> {
        match serde_json::to_value(params)? {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().collect(),
            }),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "request params must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // == Canonical Form ==
    /// Serializes the parameters with fields in lexicographic order.
    ///
    /// Nested objects are written with sorted keys too, whatever order the
    /// underlying `serde_json::Map` keeps them in.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        write_object(&mut out, self.fields.iter());
        out
    }
}

fn write_object<'a>(out: &mut String, fields: impl Iterator<Item = (&'a String, &'a Value)>) {
    out.push('{');
    for (index, (name, value)) in fields.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&Value::String(name.clone()).to_string());
        out.push(':');
        write_canonical(out, value);
    }
    out.push('}');
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<_> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            write_object(out, fields.into_iter());
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

// == Cache Key ==
/// Key indexing both the entry map and the pending-operation map.
///
/// Formatted as `{resource}_{canonical params}`, e.g. `/orders_{}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for a resource and its parameters.
    pub fn new(resource: &str, params: &RequestParams) -> Self {
        Self(format!("{}_{}", resource, params.canonical()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key contains the given substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
