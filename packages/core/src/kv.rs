//! The capability wrapper presenting the full store surface.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::{Error, Key, Node, Provider, Result};

/// Upper bound for synthesized recursion. Real tree depth is bounded by the
/// backend; this guards against a misbehaving provider reporting an
/// unbounded tree.
const MAX_FILL_DEPTH: usize = 64;

/// A full-surface key-value store over any [`Provider`].
///
/// `Kv` decorates the minimal provider contract with the optional
/// capabilities. On each call it queries whether the wrapped provider
/// implements the capability natively and delegates if so. Otherwise:
/// - `rget` is synthesized from repeated `get`s,
/// - `watch`, `move_node` and `copy` fail with
///   [`Error::Unsupported`] naming the operation - no generic
///   implementation can be derived from the minimal contract without
///   breaking its atomicity guarantees, and silently doing nothing is
///   worse than failing.
///
/// Provider errors are propagated unchanged.
///
/// The wrapper holds no mutable state beyond the provider reference and is
/// safe for concurrent use exactly to the extent the wrapped provider is.
pub struct Kv {
    provider: Box<dyn Provider>,
}

impl std::fmt::Debug for Kv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kv").finish_non_exhaustive()
    }
}

impl Kv {
    /// Wrap a provider. [`Registry::open`](crate::Registry::open) does this
    /// on behalf of callers.
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Retrieve the node under `key` with one level of children populated.
    pub async fn get(&self, key: &Key) -> Result<Node> {
        self.provider.get(key).await
    }

    /// Create or overwrite the value node under `key`.
    pub async fn set(&self, key: &Key, value: impl Into<Bytes>) -> Result<()> {
        self.provider.set(key, value.into()).await
    }

    /// Remove the node under `key` and any subtree below it.
    pub async fn delete(&self, key: &Key) -> Result<()> {
        self.provider.delete(key).await
    }

    /// Atomically replace the value under `key` if it equals `expected`.
    pub async fn cas(&self, key: &Key, expected: &[u8], value: impl Into<Bytes>) -> Result<()> {
        self.provider.cas(key, expected, value.into()).await
    }

    /// Retrieve the node under `key` with children populated to full depth.
    ///
    /// Delegates to the provider's native recursive get when present.
    /// Otherwise the tree is materialized level by level from plain `get`s;
    /// this terminates because the backend's tree has finite depth, with
    /// [`Error::DepthExceeded`] reported if a backend keeps producing
    /// deeper directories than any sane tree holds.
    pub async fn rget(&self, key: &Key) -> Result<Node> {
        if let Some(recursive) = self.provider.as_recursive() {
            return recursive.rget(key).await;
        }

        let root = self.provider.get(key).await?;
        self.fill_node(root, 0).await
    }

    /// Suspend until the node under `key` changes, then return its new
    /// state. Dropping the future cancels the wait.
    pub async fn watch(&self, key: &Key) -> Result<Node> {
        match self.provider.as_watcher() {
            Some(watcher) => watcher.watch(key).await,
            None => Err(Error::Unsupported { operation: "watch" }),
        }
    }

    /// Relocate the node (or subtree) at `from` to `to`.
    pub async fn move_node(&self, from: &Key, to: &Key) -> Result<()> {
        match self.provider.as_mover() {
            Some(mover) => mover.move_node(from, to).await,
            None => Err(Error::Unsupported { operation: "move" }),
        }
    }

    /// Duplicate the node (or subtree) at `from` under `to`.
    pub async fn copy(&self, from: &Key, to: &Key) -> Result<()> {
        match self.provider.as_copier() {
            Some(copier) => copier.copy(from, to).await,
            None => Err(Error::Unsupported { operation: "copy" }),
        }
    }

    /// Re-fetch every directory child of `node` until the whole subtree is
    /// materialized.
    fn fill_node<'a>(
        &'a self,
        node: Node,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Node>> + Send + 'a>> {
        Box::pin(async move {
            if !node.is_dir {
                return Ok(node);
            }
            if depth >= MAX_FILL_DEPTH {
                return Err(Error::DepthExceeded {
                    key: node.key,
                    limit: MAX_FILL_DEPTH,
                });
            }

            let mut node = node;
            let children = std::mem::take(&mut node.children);
            let mut filled = Vec::with_capacity(children.len());
            for child in children {
                let fetched = self.provider.get(&child.key).await?;
                filled.push(self.fill_node(fetched, depth + 1).await?);
            }
            node.children = filled;
            Ok(node)
        })
    }
}
