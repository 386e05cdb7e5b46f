//! Identifiers for animatable properties.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of an animatable property, assigned by the document layer.
/// Used as the memoization key; two distinct properties must not share an id.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = PropertyId::new("layer1/transform.position");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"layer1/transform.position\""
        );
        assert_eq!(id.to_string(), "layer1/transform.position");
    }
}
