//! Main docbind crate: a typed record mapping layer for schemaless document
//! stores.
//!
//! Application code declares schema-validated record types, binds each to a
//! store collection with exactly one identity field, and persists, fetches,
//! and queries them through a [`RecordStore`](store::RecordStore). The
//! identity field travels in the document path rather than the body, new
//! identities come from a configurable generator, and create conflicts can
//! be retried with a fresh identity.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind::{memory::InMemoryStore, prelude::*};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     pub id: Option<String>,
//!     pub name: String,
//! }
//!
//! static USER_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
//!     RecordConfig::resolve(
//!         "User",
//!         None,
//!         ConfigBlock::new().collection("users"),
//!         &[FieldSpec::identity("id"), FieldSpec::new("name")],
//!     )
//!     .expect("User record declaration")
//! });
//!
//! impl Record for User {
//!     fn config() -> &'static RecordConfig { &USER_CONFIG }
//!     fn identity(&self) -> Option<&str> { self.id.as_deref() }
//!     fn set_identity(&mut self, id: Option<String>) { self.id = id; }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = RecordStore::new(InMemoryStore::new());
//!     let users = store.records::<User>().unwrap();
//!
//!     // Create with a generated identity.
//!     let mut user = User { id: None, name: "Alice".to_string() };
//!     users.create(&mut user).await.unwrap();
//!     assert!(user.id.is_some());
//!
//!     // Query lazily.
//!     use futures::StreamExt;
//!     let mut found = users
//!         .filter("name", FilterOp::Eq, "Alice")
//!         .stream()
//!         .await
//!         .unwrap();
//!     while let Some(record) = found.next().await {
//!         println!("{:?}", record.unwrap());
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbind;

pub mod prelude;

pub use docbind_core::{backend, config, error, mapper, query, record, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docbind_memory::{InMemoryStore, InMemoryStoreBuilder};
}
