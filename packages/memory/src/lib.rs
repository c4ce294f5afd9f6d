//! In-memory tree provider for treekv.
//!
//! The reference backend: an explicit tree of parent-owned nodes behind a
//! single store-wide reader/writer lock. Implements the minimal contract
//! plus native recursive get; persistence is process lifetime.
//!
//! # Example
//!
//! ```rust,ignore
//! use treekv_core::{key, Registry};
//!
//! let registry = Registry::new();
//! treekv_memory::register(&registry)?;
//! let kv = registry.open("memory", &Default::default())?;
//! ```

mod store;
mod tree;

pub use store::{register, MemoryStore};
