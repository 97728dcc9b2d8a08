/* 📖 # How are vendor extensions normalized?

Extensions are written into one sorted map in three passes: lists, then objects, then
scalars. A later pass overwrites keys written by an earlier one, so on a name collision a
scalar beats an object, which beats a list.

Objects contribute entries in one of two ways:
- a named object is flattened into its properties: scalar children become plain entries,
  object children become nested maps, list children are dropped;
- an anonymous object (empty name) becomes a single `""` entry holding the normalized form
  of all of its children.

Inside a named object the order is reversed: scalar children are written before object
children, so a nested object wins over a scalar of the same name. Both asymmetries change
the serialized shape and are kept as they are.
*/

use crate::extension::{ExtensionNode, ExtensionValue, NormalizedExtensions};

/// Normalize a possibly absent collection of extension nodes.
///
/// Absent and empty input both yield an empty map; no input causes an error.
///
/// ```
/// use apidocs_engine::{normalize, ExtensionNode};
///
/// let nodes = vec![ExtensionNode::scalar("x-owner", "pets-team")];
/// let normalized = normalize(Some(nodes.as_slice()));
/// assert_eq!(normalized.keys().collect::<Vec<_>>(), vec!["x-owner"]);
/// assert!(normalize(None).is_empty());
/// ```
pub fn normalize(nodes: Option<&[ExtensionNode]>) -> NormalizedExtensions {
    nodes.map(normalize_nodes).unwrap_or_default()
}

/// Normalize a collection of extension nodes.
pub fn normalize_nodes(nodes: &[ExtensionNode]) -> NormalizedExtensions {
    let mut extensions = NormalizedExtensions::new();

    for node in nodes {
        if let ExtensionNode::List { name, value } = node {
            extensions.insert(name.as_str(), ExtensionValue::List(value.clone()));
        }
    }
    for node in nodes {
        if let ExtensionNode::Object { name, value } = node {
            extensions.extend(object_entries(name, value));
        }
    }
    for node in nodes {
        if let ExtensionNode::Scalar { name, value } = node {
            extensions.insert(name.as_str(), value.as_str());
        }
    }

    extensions
}

fn object_entries(name: &str, children: &[ExtensionNode]) -> NormalizedExtensions {
    if name.is_empty() {
        let mut wrapped = NormalizedExtensions::new();
        wrapped.insert(name, normalize_nodes(children));
        return wrapped;
    }
    properties_as_map(children)
}

fn properties_as_map(children: &[ExtensionNode]) -> NormalizedExtensions {
    let mut properties = NormalizedExtensions::new();
    for child in children {
        if let ExtensionNode::Scalar { name, value } = child {
            properties.insert(name.as_str(), value.as_str());
        }
    }
    for child in children {
        if let ExtensionNode::Object { name, value } = child {
            properties.insert(name.as_str(), normalize_nodes(value));
        }
    }
    properties
}
