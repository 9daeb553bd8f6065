//! Convenient re-exports of commonly used docbind types.
//!
//! ```ignore
//! use docbind::prelude::*;
//! ```

pub use docbind_core::{
    backend::{SnapshotStream, StoreBackend, StoreBackendBuilder},
    config::{ConfigBlock, FieldSpec, IdGenerator, RecordConfig, uuid4_hex},
    error::{StoreError, StoreResult},
    mapper::{Cursor, RecordMapper, RecordStream},
    query::{DocQuery, FieldFilter, FilterOp},
    record::{Record, RecordExt, Snapshot},
    store::RecordStore,
};
