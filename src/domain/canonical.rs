//! Canonical JSON serialization used as signing input.
//!
//! Signer and verifier must agree on the exact bytes, so the encoding is fixed
//! here rather than left to serializer defaults:
//!
//! - object keys sorted lexicographically by their UTF-8 bytes, at every depth
//! - array order preserved
//! - no whitespace between tokens
//! - numbers as serde_json writes them: integers verbatim, floats in shortest
//!   round-trip form (`10.0`, `0.1`)
//! - strings escaped as serde_json escapes them (non-ASCII left as UTF-8)

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A payload reduced to its one signing representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPayload {
    text: String,
}

impl CanonicalPayload {
    /// Canonicalize any serializable value.
    ///
    /// Fails when the value has no JSON representation, e.g. a map keyed by
    /// tuples or a `Serialize` impl that reports an error.
    pub fn from_serialize<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        Ok(Self::from_value(&value))
    }

    /// Canonicalize an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Self {
        Self {
            text: sorted(value).to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The exact body to put on the wire.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CanonicalPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Rebuilds objects with keys inserted in sorted order, so the result is
/// sorted whether `serde_json::Map` is a BTreeMap or insertion ordered.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (key, inner) in entries {
                out.insert(key.clone(), sorted(inner));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
