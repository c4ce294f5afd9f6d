//! The in-memory store and its provider registration.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use treekv_core::{Error, Key, Node, Provider, RecursiveGetter, Registry, Result};

use crate::tree::{self, TreeNode};

/// In-memory tree-structured store.
///
/// The whole tree sits behind one reader/writer lock scoped to the store:
/// `get`/`rget` take it shared, `set`/`delete`/`cas` take it exclusive.
/// Operations are linearizable with respect to that lock - a read that
/// begins after a mutation completes observes its effect. This trades
/// fine-grained concurrency for correctness simplicity; the store is a
/// reference backend, not a high-throughput one.
///
/// Watch, move and copy are not implemented; the capability wrapper
/// reports them as unsupported.
pub struct MemoryStore {
    root: RwLock<TreeNode>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(TreeNode::root()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TreeNode> {
        self.root.read().expect("store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, TreeNode> {
        self.root.write().expect("store lock poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MemoryStore {
    async fn get(&self, key: &Key) -> Result<Node> {
        let root = self.read();
        let node = tree::resolve(&root, key)?;
        Ok(tree::to_node_shallow(node))
    }

    async fn set(&self, key: &Key, value: Bytes) -> Result<()> {
        let mut root = self.write();
        let node = tree::resolve_mut(&mut root, key, true)?;
        if node.is_dir {
            return Err(Error::conflict(key, "is a directory"));
        }

        node.value = value;
        node.updated = Some(Utc::now());
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        if key.is_root() {
            return Err(Error::not_found(key));
        }

        let mut root = self.write();
        let parent = tree::resolve_mut(&mut root, &key.parent(), false)?;
        match parent.children.iter().position(|c| c.key == *key) {
            Some(i) => {
                // Detaching the child drops its whole subtree.
                parent.children.remove(i);
                log::debug!("{}: deleted", key);
                Ok(())
            }
            None => Err(Error::not_found(key)),
        }
    }

    async fn cas(&self, key: &Key, expected: &[u8], value: Bytes) -> Result<()> {
        let mut root = self.write();
        let node = tree::resolve_mut(&mut root, key, false)?;
        if node.is_dir {
            return Err(Error::conflict(key, "is a directory"));
        }
        if &node.value[..] != expected {
            return Err(Error::conflict(key, "compare-and-swap value mismatch"));
        }

        node.value = value;
        node.updated = Some(Utc::now());
        Ok(())
    }

    fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
        Some(self)
    }
}

#[async_trait]
impl RecursiveGetter for MemoryStore {
    async fn rget(&self, key: &Key) -> Result<Node> {
        let root = self.read();
        let node = tree::resolve(&root, key)?;
        Ok(tree::to_node_deep(node))
    }
}

/// Register the in-memory provider under the name `"memory"`.
///
/// No configuration keys are required or recognized.
pub fn register(registry: &Registry) -> Result<()> {
    registry.register(
        "memory",
        Box::new(|_config| Ok(Box::new(MemoryStore::new()) as Box<dyn Provider>)),
        &[],
        &[],
    )
}
