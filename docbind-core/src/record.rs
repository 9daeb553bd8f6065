//! The record trait and snapshot-to-record conversion.
//!
//! A record is a plain serde struct bound to one store collection. The
//! persisted body is the record's field map *minus* the identity field: the
//! identity travels in the document path, and is reattached from the
//! snapshot's own key on the way back in.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind_core::{
//!     config::{ConfigBlock, FieldSpec, RecordConfig},
//!     record::Record,
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
//!     fn config() -> &'static RecordConfig {
//!         &USER_CONFIG
//!     }
//!
//!     fn identity(&self) -> Option<&str> {
//!         self.id.as_deref()
//!     }
//!
//!     fn set_identity(&mut self, id: Option<String>) {
//!         self.id = id;
//!     }
//! }
//! ```

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Core trait for types persisted through the mapping layer.
///
/// Implementors supply their resolved storage configuration and access to
/// the identity field; everything else is derived from the serde
/// implementation.
pub trait Record: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns the type's resolved storage configuration.
    ///
    /// Typically a `LazyLock` static built with
    /// [`RecordConfig::resolve`](crate::config::RecordConfig::resolve); a
    /// declaration error panics there at first use of the type.
    fn config() -> &'static crate::config::RecordConfig;

    /// Returns the current identity value, if set.
    ///
    /// Reading never mutates the record.
    fn identity(&self) -> Option<&str>;

    /// Assigns (or clears) the identity value.
    fn set_identity(&mut self, id: Option<String>);
}

/// A raw, read-only result from the store: one document's key and field map
/// at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: String,
    fields: Document,
}

impl Snapshot {
    /// Creates a snapshot from a document key and its field map.
    pub fn new(id: impl Into<String>, fields: Document) -> Self {
        Self { id: id.into(), fields }
    }

    /// The store-assigned document key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The persisted field map (identity field not included).
    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// Decomposes the snapshot into its key and field map.
    pub fn into_parts(self) -> (String, Document) {
        (self.id, self.fields)
    }
}

/// Extension trait converting records to and from their wire representation.
///
/// Automatically implemented for all [`Record`] types.
pub trait RecordExt: Record {
    /// Serializes the record to the field map persisted as the document
    /// body. The identity field is removed: it is encoded in the document
    /// path, not the body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the type has no identity
    /// field configured.
    fn to_body(&self) -> StoreResult<Document>;

    /// Reconstructs a record from a store snapshot.
    ///
    /// The field map is taken verbatim; the identity field is set to the
    /// snapshot's own key, overriding any stale value in the map.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn to_body(&self) -> StoreResult<Document> {
        let mut body = match serialize_to_bson(self)? {
            Bson::Document(doc) => doc,
            other => {
                return Err(StoreError::Serialization(format!(
                    "record serialized to a non-document value: {other}"
                )));
            }
        };
        body.remove(R::config().id_field()?);

        Ok(body)
    }

    fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        let (id, mut fields) = snapshot.into_parts();
        fields.insert(R::config().id_field()?.to_string(), id);

        Ok(deserialize_from_bson(Bson::Document(fields))?)
    }
}
