//! Tree nodes and the path resolution engine.
//!
//! This is the only code allowed to change the shape of the tree: the
//! directory-vs-value invariant is enforced here and nowhere else.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use treekv_core::{Error, Key, Node, Result};

/// A node of the store's tree.
///
/// Every node is exclusively owned by its parent through `children`; the
/// root is owned by the store itself. Detaching a node therefore drops its
/// entire subtree.
#[derive(Debug)]
pub(crate) struct TreeNode {
    pub key: Key,
    pub is_dir: bool,
    pub value: Bytes,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// The implicit root directory.
    pub fn root() -> TreeNode {
        TreeNode {
            key: Key::root(),
            is_dir: true,
            value: Bytes::new(),
            created: None,
            updated: None,
            children: Vec::new(),
        }
    }

    fn new(key: Key, is_dir: bool) -> TreeNode {
        TreeNode {
            key,
            is_dir,
            value: Bytes::new(),
            created: Some(Utc::now()),
            updated: None,
            children: Vec::new(),
        }
    }
}

/// Walk from `root` toward `key` without touching the tree.
pub(crate) fn resolve<'a>(root: &'a TreeNode, key: &Key) -> Result<&'a TreeNode> {
    let mut node = root;
    for depth in 0..key.len() {
        let prefix = key.prefix(depth + 1);
        match node.children.iter().find(|c| c.key == prefix) {
            Some(child) => node = child,
            None => return Err(Error::NotFound { key: prefix }),
        }
    }
    Ok(node)
}

/// Walk from `root` toward `key`, creating missing nodes when `create` is
/// set: intermediate components become directories, the final component a
/// value placeholder for the caller to fill.
///
/// Children are matched by exact key; the insert-on-miss walk means no two
/// siblings can ever share a key. Creating a child under a non-directory
/// fails with `Conflict` before anything is attached, so a failed walk
/// leaves no new nodes behind.
pub(crate) fn resolve_mut<'a>(
    root: &'a mut TreeNode,
    key: &Key,
    create: bool,
) -> Result<&'a mut TreeNode> {
    let last = key.len().saturating_sub(1);

    let mut node = root;
    for depth in 0..key.len() {
        let prefix = key.prefix(depth + 1);
        match node.children.iter().position(|c| c.key == prefix) {
            Some(i) => node = &mut node.children[i],
            None if !create => return Err(Error::NotFound { key: prefix }),
            None => {
                if !node.is_dir {
                    return Err(Error::conflict(
                        &prefix,
                        format!("'{}' is not a directory", node.key),
                    ));
                }

                let is_dir = depth != last;
                log::debug!("{}: created (dir={})", prefix, is_dir);
                node.children.push(TreeNode::new(prefix, is_dir));
                node = node.children.last_mut().expect("child just pushed");
            }
        }
    }
    Ok(node)
}

/// Copy out a single node, children left empty.
fn to_node(tree: &TreeNode) -> Node {
    Node {
        key: tree.key.clone(),
        is_dir: tree.is_dir,
        children: Vec::new(),
        created: tree.created,
        updated: tree.updated,
        value: if tree.is_dir {
            None
        } else {
            Some(tree.value.clone())
        },
    }
}

/// Copy out a node with exactly one level of children populated, to
/// satisfy non-recursive get semantics.
pub(crate) fn to_node_shallow(tree: &TreeNode) -> Node {
    let mut node = to_node(tree);
    node.children = tree.children.iter().map(to_node).collect();
    node
}

/// Copy out a node with its full subtree.
pub(crate) fn to_node_deep(tree: &TreeNode) -> Node {
    let mut node = to_node(tree);
    node.children = tree.children.iter().map(to_node_deep).collect();
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use treekv_core::key;

    #[test]
    fn create_builds_intermediate_directories() {
        let mut root = TreeNode::root();
        let leaf = resolve_mut(&mut root, &key!("a/b/c"), true).unwrap();
        assert!(!leaf.is_dir);
        assert_eq!(leaf.key, key!("a/b/c"));
        assert!(leaf.created.is_some());

        let a = resolve(&root, &key!("a")).unwrap();
        assert!(a.is_dir);
        let b = resolve(&root, &key!("a/b")).unwrap();
        assert!(b.is_dir);
        assert_eq!(b.children.len(), 1);
    }

    #[test]
    fn resolving_twice_reuses_existing_nodes() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a/b"), true).unwrap();
        resolve_mut(&mut root, &key!("a/b"), true).unwrap();
        resolve_mut(&mut root, &key!("a/c"), true).unwrap();

        let a = resolve(&root, &key!("a")).unwrap();
        assert_eq!(a.children.len(), 2, "siblings must never share a key");
    }

    #[test]
    fn lookup_of_missing_key_reports_the_first_absent_prefix() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a/b"), true).unwrap();

        let err = resolve(&root, &key!("a/x/y")).unwrap_err();
        assert!(matches!(err, Error::NotFound { key } if key == key!("a/x")));

        let err = resolve_mut(&mut root, &key!("z"), false).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn cannot_create_below_a_value_node() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a"), true).unwrap();

        let err = resolve_mut(&mut root, &key!("a/b"), true).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        // The failed walk must not have attached anything under 'a'.
        let a = resolve(&root, &key!("a")).unwrap();
        assert!(a.children.is_empty());
    }

    #[test]
    fn root_resolves_to_itself() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a"), true).unwrap();

        let node = resolve(&root, &Key::root()).unwrap();
        assert!(node.is_dir);
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn shallow_copy_clears_grandchildren() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a/b/c"), true).unwrap();

        let node = to_node_shallow(resolve(&root, &key!("a")).unwrap());
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_dir);
        assert!(node.children[0].children.is_empty());

        let deep = to_node_deep(resolve(&root, &key!("a")).unwrap());
        assert_eq!(deep.children[0].children.len(), 1);
        assert_eq!(deep.children[0].children[0].key, key!("a/b/c"));
    }

    #[test]
    fn directories_never_expose_a_value() {
        let mut root = TreeNode::root();
        resolve_mut(&mut root, &key!("a/b"), true).unwrap();

        let dir = to_node_shallow(resolve(&root, &key!("a")).unwrap());
        assert!(dir.is_dir);
        assert_eq!(dir.value, None);
    }
}
