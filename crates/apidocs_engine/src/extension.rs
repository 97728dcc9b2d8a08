/* 📖 # Why a closed enum for vendor extensions?

A vendor extension is either a named string, a named list of arbitrary JSON values, or a
(possibly anonymous) object holding further extensions. Modelling the three shapes as one
enum means the normalizer matches them exhaustively and its phase ordering is spelled out
in code instead of depending on type checks.
*/

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single vendor extension attached to an operation, an info block or another extension.
///
/// In documentation files the variant is selected by a `kind` field:
///
/// ```
/// use apidocs_engine::ExtensionNode;
///
/// let node: ExtensionNode =
///     serde_json::from_str(r#"{"kind":"scalar","name":"x-owner","value":"pets-team"}"#).unwrap();
/// assert_eq!(node, ExtensionNode::scalar("x-owner", "pets-team"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtensionNode {
    /// A named leaf value.
    Scalar { name: String, value: String },
    /// A named leaf whose value is an ordered sequence, opaque to the normalizer.
    List {
        name: String,
        #[serde(default)]
        value: Vec<Value>,
    },
    /// A named or anonymous (empty name) container of nested extensions.
    Object {
        #[serde(default)]
        name: String,
        #[serde(default)]
        value: Vec<ExtensionNode>,
    },
}

impl ExtensionNode {
    pub fn scalar(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn list(name: impl Into<String>, value: Vec<Value>) -> Self {
        Self::List {
            name: name.into(),
            value,
        }
    }

    pub fn object(name: impl Into<String>, value: Vec<ExtensionNode>) -> Self {
        Self::Object {
            name: name.into(),
            value,
        }
    }

    /// The extension name; empty for anonymous objects.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name, .. } | Self::List { name, .. } | Self::Object { name, .. } => {
                name
            }
        }
    }
}

/// A value in a [`NormalizedExtensions`] map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    String(String),
    List(Vec<Value>),
    Object(NormalizedExtensions),
}

impl From<&str> for ExtensionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<NormalizedExtensions> for ExtensionValue {
    fn from(value: NormalizedExtensions) -> Self {
        Self::Object(value)
    }
}

/// Normalized vendor extensions: keys always enumerate in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedExtensions(BTreeMap<String, ExtensionValue>);

impl NormalizedExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing and returning any previous value for the key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ExtensionValue>,
    ) -> Option<ExtensionValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Insert every entry of `other`, overwriting existing keys.
    pub fn extend(&mut self, other: NormalizedExtensions) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&ExtensionValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtensionValue> {
        self.0.remove(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ExtensionValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<ExtensionValue>> FromIterator<(K, V)> for NormalizedExtensions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_nested_nodes() {
        let node: ExtensionNode = serde_json::from_value(json!({
            "kind": "object",
            "name": "x-rate-limit",
            "value": [
                {"kind": "scalar", "name": "per-minute", "value": "60"},
                {"kind": "list", "name": "tiers", "value": ["free", 3]},
                {"kind": "object", "value": []}
            ]
        }))
        .unwrap();

        assert_eq!(
            node,
            ExtensionNode::object(
                "x-rate-limit",
                vec![
                    ExtensionNode::scalar("per-minute", "60"),
                    ExtensionNode::list("tiers", vec![json!("free"), json!(3)]),
                    ExtensionNode::object("", vec![]),
                ]
            )
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<ExtensionNode, _> =
            serde_json::from_value(json!({"kind": "number", "name": "x", "value": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_name_accessor() {
        assert_eq!(ExtensionNode::scalar("x-a", "1").name(), "x-a");
        assert_eq!(ExtensionNode::list("x-b", vec![]).name(), "x-b");
        assert_eq!(ExtensionNode::object("", vec![]).name(), "");
    }

    #[test]
    fn test_normalized_extensions_serialize_as_sorted_map() {
        let mut nested = NormalizedExtensions::new();
        nested.insert("c", "2");
        let mut extensions = NormalizedExtensions::new();
        extensions.insert("z", "last");
        extensions.insert("a", nested);
        extensions.insert("m", ExtensionValue::List(vec![json!(1), json!("two")]));

        assert_eq!(
            serde_json::to_string(&extensions).unwrap(),
            r#"{"a":{"c":"2"},"m":[1,"two"],"z":"last"}"#
        );
    }
}
