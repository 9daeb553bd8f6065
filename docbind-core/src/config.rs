//! Storage configuration resolution for record types.
//!
//! Every record type carries a resolved [`RecordConfig`]: the collection it
//! maps to, the name of its identity field, how new identities are generated,
//! and whether a create conflict triggers silent regeneration. Resolution runs
//! once per declared type, merging the type's own [`ConfigBlock`] over an
//! optional parent configuration and validating the identity-field invariant.
//!
//! # Declaring a record type
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind_core::config::{ConfigBlock, FieldSpec, RecordConfig};
//!
//! static USER_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
//!     RecordConfig::resolve(
//!         "User",
//!         None,
//!         ConfigBlock::new().collection("users"),
//!         &[
//!             FieldSpec::identity("id"),
//!             FieldSpec::new("name"),
//!             FieldSpec::new("email"),
//!         ],
//!     )
//!     .expect("User record declaration")
//! });
//! ```
//!
//! A failed resolution is a declaration error: the panic at first use of the
//! static means no record of that type can ever be constructed.

use std::{fmt, sync::Arc};

use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Returns a random 32-character lowercase hex string.
///
/// This is the default identity generator for all record types.
pub fn uuid4_hex() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A cloneable identity-generating function.
///
/// Generators take no arguments; fixed parameters are captured by the
/// closure. The default generator is [`uuid4_hex`].
#[derive(Clone)]
pub struct IdGenerator(Arc<dyn Fn() -> String + Send + Sync>);

impl IdGenerator {
    /// Wraps a closure as an identity generator.
    pub fn new(generate: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(generate))
    }

    /// Produces a new identity value.
    pub fn generate(&self) -> String {
        (self.0)()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(uuid4_hex)
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdGenerator(..)")
    }
}

/// Declaration of a single record field, as seen by configuration resolution.
///
/// Only the name and the identity marker matter here; value typing and
/// validation belong to the record's serde implementation.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// The field name as it appears in the persisted field map.
    pub name: &'static str,
    /// Whether this field carries the record's identity.
    pub identity: bool,
}

impl FieldSpec {
    /// Declares a plain data field.
    pub const fn new(name: &'static str) -> Self {
        Self { name, identity: false }
    }

    /// Declares the identity field.
    pub const fn identity(name: &'static str) -> Self {
        Self { name, identity: true }
    }
}

/// A record type's own (unresolved) configuration declaration.
///
/// Every setting is optional; unset values are inherited from the parent
/// configuration during [`RecordConfig::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBlock {
    collection: Option<String>,
    id_generator: Option<Option<IdGenerator>>,
    retry_create_on_conflict: Option<bool>,
}

impl ConfigBlock {
    /// Creates an empty configuration block (everything inherited).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collection this type maps to.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Overrides the identity generator.
    pub fn id_generator(mut self, generator: IdGenerator) -> Self {
        self.id_generator = Some(Some(generator));
        self
    }

    /// Disables identity generation for this type.
    ///
    /// Records of the type must then carry a caller-assigned identity before
    /// `create`; a generation request fails with
    /// [`StoreError::NoGenerator`](crate::error::StoreError::NoGenerator).
    pub fn no_id_generator(mut self) -> Self {
        self.id_generator = Some(None);
        self
    }

    /// Sets whether a create conflict silently regenerates the identity and
    /// retries.
    pub fn retry_create_on_conflict(mut self, retry: bool) -> Self {
        self.retry_create_on_conflict = Some(retry);
        self
    }
}

/// The fully resolved, immutable storage configuration of a record type.
#[derive(Debug, Clone)]
pub struct RecordConfig {
    collection: Option<String>,
    id_field: Option<String>,
    id_generator: Option<IdGenerator>,
    retry_create_on_conflict: bool,
}

impl RecordConfig {
    /// The root base configuration.
    ///
    /// Declares no collection and no identity field; it exists only to seed
    /// resolution for types without a parent and is exempt from the
    /// identity-field check.
    pub fn base() -> Self {
        Self {
            collection: None,
            id_field: None,
            id_generator: Some(IdGenerator::default()),
            retry_create_on_conflict: true,
        }
    }

    /// Resolves the configuration for a newly declared record type.
    ///
    /// Merges `block` over `parent` (child wins field by field; no parent
    /// means [`RecordConfig::base`]), then scans `fields` for the identity
    /// marker. Exactly one identity field among the type's own declarations
    /// establishes `id_field`, overriding any inherited value. Zero or
    /// several identity fields are a declaration error unless an `id_field`
    /// was inherited.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when the identity-field invariant is
    /// violated. `name` is only used in that message.
    pub fn resolve(
        name: &str,
        parent: Option<&RecordConfig>,
        block: ConfigBlock,
        fields: &[FieldSpec],
    ) -> StoreResult<RecordConfig> {
        let inherited = parent.cloned().unwrap_or_else(RecordConfig::base);

        let mut resolved = RecordConfig {
            collection: block.collection.or(inherited.collection),
            id_generator: match block.id_generator {
                Some(own) => own,
                None => inherited.id_generator,
            },
            retry_create_on_conflict: block
                .retry_create_on_conflict
                .unwrap_or(inherited.retry_create_on_conflict),
            id_field: inherited.id_field,
        };

        let identities: Vec<&str> = fields
            .iter()
            .filter(|field| field.identity)
            .map(|field| field.name)
            .collect();

        if identities.len() == 1 {
            resolved.id_field = Some(identities[0].to_string());
        } else if resolved.id_field.is_none() {
            return Err(StoreError::Config(format!(
                "\"{name}\" must declare exactly one identity field"
            )));
        }

        Ok(resolved)
    }

    /// Returns the collection this type maps to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] when no collection was ever configured
    /// along the inheritance chain.
    pub fn collection(&self) -> StoreResult<&str> {
        self.collection
            .as_deref()
            .ok_or_else(|| StoreError::Config("no collection configured".to_string()))
    }

    /// Returns the name of the identity field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] on the root base configuration, which
    /// has none.
    pub fn id_field(&self) -> StoreResult<&str> {
        self.id_field
            .as_deref()
            .ok_or_else(|| StoreError::Config("no identity field configured".to_string()))
    }

    /// Returns the identity generator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoGenerator`] when generation was disabled via
    /// [`ConfigBlock::no_id_generator`].
    pub fn id_generator(&self) -> StoreResult<&IdGenerator> {
        self.id_generator.as_ref().ok_or_else(|| {
            StoreError::NoGenerator(self.collection.clone().unwrap_or_default())
        })
    }

    /// Whether a create conflict regenerates the identity and retries.
    pub fn retry_create_on_conflict(&self) -> bool {
        self.retry_create_on_conflict
    }
}
