//! The node data model exchanged by every operation.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Key;

/// An entry within a key-value tree.
///
/// A node is either a value (`is_dir == false`, `value` populated) or a
/// directory (`is_dir == true`, `children` populated) - never both. The
/// wire field names (`dir`, `childs`) are part of the serialized shape
/// consumed by external tooling.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The absolute, normalized key for this node.
    pub key: Key,

    /// True if this node represents a directory.
    #[serde(rename = "dir", default, skip_serializing_if = "is_false")]
    pub is_dir: bool,

    /// Child nodes. Only valid when `is_dir` is true. How many levels are
    /// populated depends on the operation: `get` fills exactly one, `rget`
    /// fills all of them.
    #[serde(rename = "childs", default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Creation time, if the provider tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    /// Last update time, if the provider tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Value payload. Only valid when `is_dir` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Bytes>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Node {
    /// A value node carrying `value`.
    pub fn value_node(key: Key, value: impl Into<Bytes>) -> Node {
        Node {
            key,
            value: Some(value.into()),
            ..Node::default()
        }
    }

    /// An empty directory node.
    pub fn dir_node(key: Key) -> Node {
        Node {
            key,
            is_dir: true,
            ..Node::default()
        }
    }

    /// Find the immediate child named `name`, by its full key.
    pub fn child(&self, name: &str) -> Option<&Node> {
        let key = self.key.child(name);
        self.children.iter().find(|c| c.key == key)
    }

    /// Keys of the immediate children.
    pub fn child_keys(&self) -> Vec<&Key> {
        self.children.iter().map(|c| &c.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;

    #[test]
    fn constructors_set_kind() {
        let value = Node::value_node(key!("a/b"), "payload");
        assert!(!value.is_dir);
        assert_eq!(value.value, Some(Bytes::from("payload")));
        assert!(value.children.is_empty());

        let dir = Node::dir_node(key!("a"));
        assert!(dir.is_dir);
        assert_eq!(dir.value, None);
    }

    #[test]
    fn child_lookup_uses_full_keys() {
        let mut dir = Node::dir_node(key!("a"));
        dir.children.push(Node::value_node(key!("a/b"), "1"));
        dir.children.push(Node::dir_node(key!("a/c")));

        assert_eq!(dir.child("b").unwrap().key, key!("a/b"));
        assert!(dir.child("c").unwrap().is_dir);
        assert!(dir.child("missing").is_none());
        assert_eq!(dir.child_keys(), vec![&key!("a/b"), &key!("a/c")]);
    }

    #[test]
    fn serde_uses_wire_names_and_omits_empty_fields() {
        let mut dir = Node::dir_node(key!("a"));
        dir.children.push(Node::value_node(key!("a/b"), "1"));

        let json = serde_json::to_string(&dir).unwrap();
        assert!(json.contains("\"dir\":true"));
        assert!(json.contains("\"childs\""));
        assert!(!json.contains("created"));
        assert!(!json.contains("value"));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dir);
    }

    #[test]
    fn serde_round_trips_values() {
        let node = Node::value_node(key!("k"), vec![0u8, 1, 2]);
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("\"dir\""));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
