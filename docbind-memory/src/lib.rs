//! In-memory backend for the docbind record mapping layer.
//!
//! Provides [`InMemoryStore`], a fully functional [`StoreBackend`]
//! implementation backed by HashMaps behind an async read-write lock.
//! Intended for tests and development.
//!
//! [`StoreBackend`]: docbind_core::backend::StoreBackend
//!
//! # Example
//!
//! ```ignore
//! use docbind_core::store::RecordStore;
//! use docbind_memory::InMemoryStore;
//!
//! let store = RecordStore::new(InMemoryStore::new());
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbind_memory;

mod evaluator;
mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
