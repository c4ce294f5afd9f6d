//! Core treekv: a uniform, hierarchical key-value abstraction.
//!
//! treekv lets callers treat a flat key-value backend (etcd, consul, an
//! in-memory store, ...) as a filesystem-like tree of directories and
//! values, with one error and concurrency contract across all backends:
//! - `Key`: normalized `/`-delimited path addressing a node
//! - `Node`: the record every operation exchanges (directory xor value)
//! - `Provider`: the minimal contract a backend must implement
//! - `Kv`: the capability wrapper presenting the full store surface
//! - `Registry`: name -> factory mapping with config validation
//!
//! A backend only has to implement [`Provider`] (get/set/delete/cas).
//! Optional capabilities - recursive get, watch, move, copy - are detected
//! per provider and either delegated to natively or synthesized by [`Kv`]
//! where that is safe.
//!
//! # Example
//!
//! ```rust,ignore
//! use treekv_core::{key, Registry};
//!
//! let registry = Registry::new();
//! treekv_memory::register(&registry)?;
//!
//! let kv = registry.open("memory", &Default::default())?;
//! kv.set(&key!("users/alice"), "hello").await?;
//! let node = kv.get(&key!("users/alice")).await?;
//! ```

pub use bytes::Bytes;

mod error;
mod key;
mod kv;
mod node;
mod prefix;
mod registry;
mod traits;

pub use error::{Error, Result};
pub use key::Key;
pub use kv::Kv;
pub use node::Node;
pub use prefix::Prefixed;
pub use registry::{Config, Factory, ProviderInfo, Registry};
pub use traits::{Copier, KeyWatcher, Mover, Provider, RecursiveGetter};

// Behavioral contract shared by every provider implementation
#[cfg(any(test, feature = "test-utils"))]
pub mod conformance;
