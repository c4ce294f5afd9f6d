//! Provider contract and optional capability contracts.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{Key, Node, Result};

/// The minimal contract a backend must implement.
///
/// Every operation is async: dropping the returned future cancels the call,
/// which is the cancellation contract providers performing external I/O
/// must honor. Implementations must be safe for concurrent callers.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Provider>`, which is how
/// [`Registry::open`](crate::Registry::open) hands providers to the
/// capability wrapper.
///
/// # Capability discovery
///
/// A provider advertises an optional capability purely by overriding the
/// matching `as_*` accessor to return `Some(self)`; there is no separate
/// feature flag. The capability wrapper queries these accessors on every
/// call and synthesizes or rejects what is missing.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Retrieve the node stored under `key`.
    ///
    /// Directory nodes are returned with exactly one level of children
    /// populated.
    ///
    /// # Returns
    ///
    /// * `Ok(node)` - The node at `key`.
    /// * `Err(Error::NotFound)` - No node exists at `key`.
    async fn get(&self, key: &Key) -> Result<Node>;

    /// Create or overwrite the value node under `key`, creating any missing
    /// intermediate directories.
    ///
    /// Fails with [`Error::Conflict`](crate::Error::Conflict) if a path
    /// component already exists as a value node (a value cannot be
    /// descended through) or if `key` itself names an existing directory.
    async fn set(&self, key: &Key, value: Bytes) -> Result<()>;

    /// Remove the node under `key` and, for a directory, its entire
    /// subtree, atomically with respect to concurrent readers.
    async fn delete(&self, key: &Key) -> Result<()>;

    /// Atomically replace the value under `key` with `value`, but only if
    /// the current value equals `expected` byte for byte.
    ///
    /// Fails with [`Error::Conflict`](crate::Error::Conflict) on mismatch.
    async fn cas(&self, key: &Key, expected: &[u8], value: Bytes) -> Result<()>;

    /// Native recursive-get support, if any.
    fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
        None
    }

    /// Native watch support, if any.
    fn as_watcher(&self) -> Option<&dyn KeyWatcher> {
        None
    }

    /// Native move support, if any.
    fn as_mover(&self) -> Option<&dyn Mover> {
        None
    }

    /// Native copy support, if any.
    fn as_copier(&self) -> Option<&dyn Copier> {
        None
    }
}

/// Recursive retrieval: like [`Provider::get`] but children are populated
/// to full depth.
#[async_trait]
pub trait RecursiveGetter: Send + Sync {
    async fn rget(&self, key: &Key) -> Result<Node>;
}

/// Change notification.
#[async_trait]
pub trait KeyWatcher: Send + Sync {
    /// Suspend until the node under `key` changes, then return its new
    /// state. Dropping the future cancels the wait; the implementation
    /// must not leak the waiting operation.
    async fn watch(&self, key: &Key) -> Result<Node>;
}

/// Subtree relocation.
#[async_trait]
pub trait Mover: Send + Sync {
    async fn move_node(&self, from: &Key, to: &Key) -> Result<()>;
}

/// Subtree duplication.
#[async_trait]
pub trait Copier: Send + Sync {
    async fn copy(&self, from: &Key, to: &Key) -> Result<()>;
}

// Blanket implementations for boxes and shared references

#[async_trait]
impl<T: Provider + ?Sized> Provider for Box<T> {
    async fn get(&self, key: &Key) -> Result<Node> {
        (**self).get(key).await
    }

    async fn set(&self, key: &Key, value: Bytes) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key).await
    }

    async fn cas(&self, key: &Key, expected: &[u8], value: Bytes) -> Result<()> {
        (**self).cas(key, expected, value).await
    }

    fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
        (**self).as_recursive()
    }

    fn as_watcher(&self) -> Option<&dyn KeyWatcher> {
        (**self).as_watcher()
    }

    fn as_mover(&self) -> Option<&dyn Mover> {
        (**self).as_mover()
    }

    fn as_copier(&self) -> Option<&dyn Copier> {
        (**self).as_copier()
    }
}

#[async_trait]
impl<T: Provider + ?Sized> Provider for Arc<T> {
    async fn get(&self, key: &Key) -> Result<Node> {
        (**self).get(key).await
    }

    async fn set(&self, key: &Key, value: Bytes) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &Key) -> Result<()> {
        (**self).delete(key).await
    }

    async fn cas(&self, key: &Key, expected: &[u8], value: Bytes) -> Result<()> {
        (**self).cas(key, expected, value).await
    }

    fn as_recursive(&self) -> Option<&dyn RecursiveGetter> {
        (**self).as_recursive()
    }

    fn as_watcher(&self) -> Option<&dyn KeyWatcher> {
        (**self).as_watcher()
    }

    fn as_mover(&self) -> Option<&dyn Mover> {
        (**self).as_mover()
    }

    fn as_copier(&self) -> Option<&dyn Copier> {
        (**self).as_copier()
    }
}
