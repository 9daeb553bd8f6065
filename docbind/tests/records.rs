//! End-to-end tests for the record mapping layer over the in-memory backend.

use std::sync::{
    Arc, LazyLock, Mutex,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use bson::{Document, doc};
use docbind::{memory::InMemoryStore, prelude::*};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    id: Option<String>,
    name: String,
    count: i64,
}

static WIDGET_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
    // Sequence generator so retried creates always pick an unused id.
    let sequence = AtomicU64::new(0);
    RecordConfig::resolve(
        "Widget",
        None,
        ConfigBlock::new()
            .collection("widgets")
            .id_generator(IdGenerator::new(move || {
                format!("w-{}", sequence.fetch_add(1, Ordering::Relaxed))
            })),
        &[
            FieldSpec::identity("id"),
            FieldSpec::new("name"),
            FieldSpec::new("count"),
        ],
    )
    .expect("Widget record declaration")
});

impl Record for Widget {
    fn config() -> &'static RecordConfig {
        &WIDGET_CONFIG
    }

    fn identity(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_identity(&mut self, id: Option<String>) {
        self.id = id;
    }
}

fn widget(name: &str, count: i64) -> Widget {
    Widget { id: None, name: name.to_string(), count }
}

/// Widget variant whose type propagates create conflicts instead of
/// retrying.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StubbornWidget {
    id: Option<String>,
    name: String,
}

static STUBBORN_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
    RecordConfig::resolve(
        "StubbornWidget",
        None,
        ConfigBlock::new()
            .collection("stubborn_widgets")
            .retry_create_on_conflict(false),
        &[FieldSpec::identity("id"), FieldSpec::new("name")],
    )
    .expect("StubbornWidget record declaration")
});

impl Record for StubbornWidget {
    fn config() -> &'static RecordConfig {
        &STUBBORN_CONFIG
    }

    fn identity(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_identity(&mut self, id: Option<String>) {
        self.id = id;
    }
}

/// Widget variant with a fixed-output generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FixedWidget {
    id: Option<String>,
    name: String,
}

static FIXED_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
    RecordConfig::resolve(
        "FixedWidget",
        None,
        ConfigBlock::new()
            .collection("fixed_widgets")
            .id_generator(IdGenerator::new(|| "ab12cd".to_string())),
        &[FieldSpec::identity("id"), FieldSpec::new("name")],
    )
    .expect("FixedWidget record declaration")
});

impl Record for FixedWidget {
    fn config() -> &'static RecordConfig {
        &FIXED_CONFIG
    }

    fn identity(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_identity(&mut self, id: Option<String>) {
        self.id = id;
    }
}

/// Widget variant with identity generation disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManualWidget {
    id: Option<String>,
    name: String,
}

static MANUAL_CONFIG: LazyLock<RecordConfig> = LazyLock::new(|| {
    RecordConfig::resolve(
        "ManualWidget",
        None,
        ConfigBlock::new()
            .collection("manual_widgets")
            .no_id_generator(),
        &[FieldSpec::identity("id"), FieldSpec::new("name")],
    )
    .expect("ManualWidget record declaration")
});

impl Record for ManualWidget {
    fn config() -> &'static RecordConfig {
        &MANUAL_CONFIG
    }

    fn identity(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_identity(&mut self, id: Option<String>) {
        self.id = id;
    }
}

/// One logged backend call: operation name, document id, collection, and the
/// body sent (for create/update).
#[derive(Debug, Clone, PartialEq)]
struct Call {
    op: &'static str,
    id: String,
    collection: String,
    body: Option<Document>,
}

/// Backend wrapper that logs every call before delegating to an
/// [`InMemoryStore`].
#[derive(Debug, Clone, Default)]
struct RecordingBackend {
    inner: InMemoryStore,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingBackend {
    fn new() -> Self {
        Self::default()
    }

    fn log(&self, op: &'static str, id: &str, collection: &str, body: Option<&Document>) {
        self.calls.lock().unwrap().push(Call {
            op,
            id: id.to_string(),
            collection: collection.to_string(),
            body: body.cloned(),
        });
    }

    fn calls(&self, op: &'static str) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.op == op)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StoreBackend for RecordingBackend {
    async fn get_document(&self, id: &str, collection: &str) -> StoreResult<Option<Snapshot>> {
        self.log("get", id, collection, None);
        self.inner.get_document(id, collection).await
    }

    async fn create_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        self.log("create", id, collection, Some(&body));
        self.inner
            .create_document(id, body, collection)
            .await
    }

    async fn update_document(
        &self,
        id: &str,
        body: Document,
        collection: &str,
    ) -> StoreResult<()> {
        self.log("update", id, collection, Some(&body));
        self.inner
            .update_document(id, body, collection)
            .await
    }

    async fn delete_document(&self, id: &str, collection: &str) -> StoreResult<()> {
        self.log("delete", id, collection, None);
        self.inner.delete_document(id, collection).await
    }

    async fn stream_documents(
        &self,
        query: DocQuery,
        collection: &str,
    ) -> StoreResult<SnapshotStream> {
        self.inner
            .stream_documents(query, collection)
            .await
    }
}

#[tokio::test]
async fn create_generates_an_identity_and_sends_one_create_call() {
    let backend = RecordingBackend::new();
    let store = RecordStore::new(backend.clone());
    let widgets = store.records::<Widget>().unwrap();

    let mut record = widget("a", 1);
    widgets.create(&mut record).await.unwrap();

    let generated = record.id.clone().expect("identity assigned by create");
    let creates = backend.calls("create");
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].id, generated);
    assert_eq!(creates[0].collection, "widgets");
    assert_eq!(creates[0].body, Some(doc! { "name": "a", "count": 1_i64 }));
}

#[tokio::test]
async fn fixed_generator_yields_a_deterministic_identity() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<FixedWidget>().unwrap();

    let mut record = FixedWidget { id: None, name: "a".to_string() };
    widgets.create(&mut record).await.unwrap();
    assert_eq!(record.id.as_deref(), Some("ab12cd"));
}

#[tokio::test]
async fn create_keeps_a_caller_assigned_identity() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<Widget>().unwrap();

    let mut record = widget("a", 1);
    record.id = Some("chosen".to_string());
    widgets.create(&mut record).await.unwrap();
    assert_eq!(record.id.as_deref(), Some("chosen"));

    let found = widgets.get("chosen").await.unwrap().unwrap();
    assert_eq!(found, record);
}

#[tokio::test]
async fn create_conflict_retries_with_a_fresh_identity() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<Widget>().unwrap();

    let mut occupant = widget("first", 1);
    occupant.id = Some("taken".to_string());
    widgets.create(&mut occupant).await.unwrap();

    // Same id forces a conflict; the retry must never reuse it.
    let mut late = widget("second", 2);
    late.id = Some("taken".to_string());
    widgets.create(&mut late).await.unwrap();

    let new_id = late.id.expect("identity regenerated");
    assert_ne!(new_id, "taken");

    let found = widgets.get(&new_id).await.unwrap().unwrap();
    assert_eq!(found.name, "second");
}

#[tokio::test]
async fn create_conflict_propagates_when_retry_is_disabled() {
    let store = RecordStore::new(InMemoryStore::new());
    let stubborn = store.records::<StubbornWidget>().unwrap();

    let mut occupant = StubbornWidget { id: Some("s1".to_string()), name: "first".to_string() };
    stubborn.create(&mut occupant).await.unwrap();

    let mut late = StubbornWidget { id: Some("s1".to_string()), name: "second".to_string() };
    let err = stubborn.create(&mut late).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(id, col) if id == "s1" && col == "stubborn_widgets"));
}

#[tokio::test]
async fn create_without_a_generator_requires_an_identity() {
    let store = RecordStore::new(InMemoryStore::new());
    let manual = store.records::<ManualWidget>().unwrap();

    let mut record = ManualWidget { id: None, name: "a".to_string() };
    let err = manual.create(&mut record).await.unwrap_err();
    assert!(matches!(err, StoreError::NoGenerator(_)));

    record.id = Some("m1".to_string());
    manual.create(&mut record).await.unwrap();
}

#[tokio::test]
async fn get_missing_document_is_none_not_an_error() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<Widget>().unwrap();

    assert!(widgets.get("w1").await.unwrap().is_none());
}

#[tokio::test]
async fn update_sends_current_fields_minus_identity() {
    let backend = RecordingBackend::new();
    let store = RecordStore::new(backend.clone());
    let widgets = store.records::<Widget>().unwrap();

    let mut record = widget("a", 1);
    widgets.create(&mut record).await.unwrap();

    record.count = 2;
    widgets.update(&record).await.unwrap();

    let id = record.id.clone().unwrap();
    let updates = backend.calls("update");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, id);
    assert_eq!(updates[0].body, Some(doc! { "name": "a", "count": 2_i64 }));

    let found = widgets.get(&id).await.unwrap().unwrap();
    assert_eq!(found.count, 2);
}

#[tokio::test]
async fn update_without_identity_is_a_precondition_violation() {
    let backend = RecordingBackend::new();
    let store = RecordStore::new(backend.clone());
    let widgets = store.records::<Widget>().unwrap();

    let record = widget("a", 1);
    let err = widgets.update(&record).await.unwrap_err();
    assert!(matches!(err, StoreError::MissingIdentity(col) if col == "widgets"));
    assert!(backend.calls("update").is_empty());
}

#[tokio::test]
async fn delete_without_identity_performs_no_store_call() {
    let backend = RecordingBackend::new();
    let store = RecordStore::new(backend.clone());
    let widgets = store.records::<Widget>().unwrap();

    let record = widget("a", 1);
    widgets.delete(&record).await.unwrap();
    assert!(backend.calls("delete").is_empty());
}

#[tokio::test]
async fn delete_with_identity_issues_exactly_one_call() {
    let backend = RecordingBackend::new();
    let store = RecordStore::new(backend.clone());
    let widgets = store.records::<Widget>().unwrap();

    let mut record = widget("a", 1);
    widgets.create(&mut record).await.unwrap();
    let id = record.id.clone().unwrap();

    widgets.delete(&record).await.unwrap();

    let deletes = backend.calls("delete");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].id, id);
    assert!(widgets.get(&id).await.unwrap().is_none());

    // The in-memory record survives deletion of the persisted copy.
    assert_eq!(record.id.as_deref(), Some(id.as_str()));
}

#[tokio::test]
async fn cursor_streams_typed_records_with_snapshot_identities() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<Widget>().unwrap();

    for (name, count) in [("a", 1), ("b", 2), ("c", 3)] {
        widgets.create(&mut widget(name, count)).await.unwrap();
    }

    let found = widgets
        .filter("count", FilterOp::Ge, 2_i64)
        .stream()
        .await
        .unwrap()
        .collect::<Vec<_>>()
        .await;

    assert_eq!(found.len(), 2);
    for record in found {
        let record = record.unwrap();
        let id = record.id.clone().expect("identity from snapshot key");
        let fetched = widgets.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }
}

#[tokio::test]
async fn cursor_chaining_is_immutable() {
    let store = RecordStore::new(InMemoryStore::new());
    let widgets = store.records::<Widget>().unwrap();

    for (name, count) in [("a", 1), ("b", 2), ("c", 3)] {
        widgets.create(&mut widget(name, count)).await.unwrap();
    }

    let base = widgets.filter("count", FilterOp::Ge, 1_i64);
    let narrowed = base.filter("count", FilterOp::Ge, 3_i64);
    let limited = base.limit(2);

    let all = base.stream().await.unwrap().collect::<Vec<_>>().await;
    let narrow = narrowed.stream().await.unwrap().collect::<Vec<_>>().await;
    let capped = limited.stream().await.unwrap().collect::<Vec<_>>().await;

    assert_eq!(all.len(), 3);
    assert_eq!(narrow.len(), 1);
    assert_eq!(capped.len(), 2);
}

#[tokio::test]
async fn boxed_dyn_backend_works_through_the_store() {
    let backend: Box<dyn StoreBackend> = Box::new(InMemoryStore::new());
    let store = RecordStore::new(backend);
    let widgets = store.records::<Widget>().unwrap();

    let mut record = widget("dyn", 9);
    widgets.create(&mut record).await.unwrap();
    let id = record.id.clone().unwrap();

    let found = widgets.get(&id).await.unwrap().unwrap();
    assert_eq!(found, record);
}
