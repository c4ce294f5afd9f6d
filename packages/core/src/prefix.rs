//! Key-prefix scoping decorator.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{Error, Key, Node, Provider, RecursiveGetter, Result};

/// Scopes every operation of an inner provider under a fixed key prefix.
///
/// Callers address keys relative to the prefix; nodes coming back have the
/// prefix stripped from their own and all descendant keys. Useful for
/// handing a component its own namespace inside a shared store.
///
/// Native recursive get is forwarded (with stripping) when the inner
/// provider has it. Watch, move and copy are not forwarded: their key
/// arguments would need translation in both directions and the scoped view
/// does not define that.
pub struct Prefixed<P> {
    inner: P,
    prefix: Key,
}

impl<P> Prefixed<P> {
    pub fn new(inner: P, prefix: Key) -> Self {
        Self { inner, prefix }
    }
}

fn strip_node(mut node: Node, prefix: &Key) -> Node {
    node.key = node.key.strip_prefix(prefix);
    node.children = node
        .children
        .into_iter()
        .map(|child| strip_node(child, prefix))
        .collect();
    node
}

#[async_trait]
impl<P: Provider> Provider for Prefixed<P> {
    async fn get(&self, key: &Key) -> Result<Node> {
        let node = self.inner.get(&self.prefix.join(key)).await?;
        Ok(strip_node(node, &self.prefix))
    }

    async fn set(&self, key: &Key, value: Bytes) -> Result<()> {
        self.inner.set(&self.prefix.join(key), value).await
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        self.inner.delete(&self.prefix.join(key)).await
    }

    async fn cas(&self, key: &Key, expected: &[u8], value: Bytes) -> Result<()> {
        self.inner.cas(&self.prefix.join(key), expected, value).await
    }

    fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
        self.inner.as_recursive().map(|_| self as &dyn RecursiveGetter)
    }
}

#[async_trait]
impl<P: Provider> RecursiveGetter for Prefixed<P> {
    async fn rget(&self, key: &Key) -> Result<Node> {
        let recursive = self
            .inner
            .as_recursive()
            .ok_or(Error::Unsupported { operation: "rget" })?;
        let node = recursive.rget(&self.prefix.join(key)).await?;
        Ok(strip_node(node, &self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key;
    use std::sync::Mutex;

    /// Records the keys it is called with and answers with a small subtree
    /// rooted at the requested key.
    struct RecordingStore {
        seen: Mutex<Vec<Key>>,
        recursive: bool,
    }

    impl RecordingStore {
        fn new(recursive: bool) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                recursive,
            }
        }

        fn record(&self, key: &Key) {
            self.seen.lock().unwrap().push(key.clone());
        }

        fn answer(&self, key: &Key) -> Node {
            let mut dir = Node::dir_node(key.clone());
            dir.children = vec![Node::value_node(key.child("leaf"), "v")];
            dir
        }
    }

    #[async_trait]
    impl Provider for RecordingStore {
        async fn get(&self, key: &Key) -> Result<Node> {
            self.record(key);
            Ok(self.answer(key))
        }

        async fn set(&self, key: &Key, _value: Bytes) -> Result<()> {
            self.record(key);
            Ok(())
        }

        async fn delete(&self, key: &Key) -> Result<()> {
            self.record(key);
            Ok(())
        }

        async fn cas(&self, key: &Key, _expected: &[u8], _value: Bytes) -> Result<()> {
            self.record(key);
            Ok(())
        }

        fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
            if self.recursive {
                Some(self)
            } else {
                None
            }
        }
    }

    #[async_trait]
    impl RecursiveGetter for RecordingStore {
        async fn rget(&self, key: &Key) -> Result<Node> {
            self.record(key);
            Ok(self.answer(key))
        }
    }

    #[tokio::test]
    async fn operations_are_scoped_under_the_prefix() {
        let prefixed = Prefixed::new(RecordingStore::new(false), key!("tenant/alpha"));

        prefixed.set(&key!("a/b"), Bytes::from("x")).await.unwrap();
        prefixed.delete(&key!("a/b")).await.unwrap();
        prefixed.cas(&key!("a/b"), b"x", Bytes::from("y")).await.unwrap();
        prefixed.get(&key!("a")).await.unwrap();

        let seen = prefixed.inner.seen.lock().unwrap().clone();
        assert!(seen.iter().all(|k| k.starts_with(&key!("tenant/alpha"))));
        assert_eq!(seen[0], key!("tenant/alpha/a/b"));
        assert_eq!(seen[3], key!("tenant/alpha/a"));
    }

    #[tokio::test]
    async fn returned_keys_have_the_prefix_stripped() {
        let prefixed = Prefixed::new(RecordingStore::new(false), key!("tenant/alpha"));

        let node = prefixed.get(&key!("a")).await.unwrap();
        assert_eq!(node.key, key!("a"));
        assert_eq!(node.children[0].key, key!("a/leaf"));
    }

    #[tokio::test]
    async fn recursive_capability_follows_the_inner_provider() {
        let plain = Prefixed::new(RecordingStore::new(false), key!("p"));
        assert!(plain.as_recursive().is_none());

        let recursive = Prefixed::new(RecordingStore::new(true), key!("p"));
        let getter = recursive.as_recursive().expect("inner store is recursive");
        let node = getter.rget(&key!("a")).await.unwrap();
        assert_eq!(node.key, key!("a"));
        assert_eq!(node.children[0].key, key!("a/leaf"));
    }
}
