//! A typed record mapping layer for schemaless document stores.
//!
//! This crate is the core of the docbind project and provides:
//!
//! - **Configuration registry** ([`config`]) - Per-type storage configuration
//!   with layered parent/child merge and identity-field validation
//! - **Record traits** ([`record`]) - The record trait plus snapshot-to-record
//!   conversion
//! - **Store backend abstraction** ([`backend`]) - The document-store client
//!   contract
//! - **Query model** ([`query`]) - Chained equality/comparison filters and
//!   result limits
//! - **Mapper and cursor** ([`mapper`]) - Instance-level operations and lazy
//!   typed query streams
//! - **Record store** ([`store`]) - Entry point binding record types to a
//!   backend
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind_core::{
//!     config::{ConfigBlock, FieldSpec, RecordConfig},
//!     record::Record,
//!     store::RecordStore,
//! };
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
//! # async fn example(backend: impl docbind_core::backend::StoreBackend) {
//! let store = RecordStore::new(backend);
//! let mut user = User { id: None, name: "Alice".to_string() };
//! store.records::<User>().unwrap().create(&mut user).await.unwrap();
//! # }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbind_core;

pub mod backend;
pub mod config;
pub mod error;
pub mod mapper;
pub mod query;
pub mod record;
pub mod store;
