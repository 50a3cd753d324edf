use serde_json::Value;
use serde_json_path::JsonPath;

/// Result of a JSONPath query over a response body.
///
/// A query never fails: malformed JSON, an invalid path and a path with no
/// match all produce an empty result, for which [`exists`](Self::exists)
/// is `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathValue {
    nodes: Vec<Value>,
}

impl PathValue {
    /// Evaluate an RFC 9535 JSONPath expression (e.g. `$.items[0].id`)
    /// against raw JSON bytes.
    #[must_use]
    pub fn query(data: &[u8], path: &str) -> Self {
        let document: Value = match serde_json::from_slice(data) {
            Ok(document) => document,
            Err(err) => {
                tracing::trace!(error = %err, path, "path query over non-JSON data");
                return Self::default();
            }
        };
        let path = match JsonPath::parse(path) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::trace!(error = %err, path, "invalid JSONPath expression");
                return Self::default();
            }
        };
        Self {
            nodes: path.query(&document).all().into_iter().cloned().collect(),
        }
    }

    /// Whether the path matched at least one node
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// First matched node
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.nodes.first()
    }

    /// All matched nodes, in document order
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.nodes
    }

    /// First match as a string, if it is one
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// First match as an integer, if it is one
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }

    /// First match as a float, if it is a number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }

    /// First match as a boolean, if it is one
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    /// Text form of the first match: strings unquoted, other values as
    /// JSON, and an empty string when nothing matched.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self.value() {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}
