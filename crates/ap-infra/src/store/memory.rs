//! In-process realtime document store.
//!
//! Behaves like the hosted store the dashboard targets: collections of JSON
//! documents, listeners that receive the full ordered collection on
//! registration and after every write, atomic increments and batch writes.
//!
//! 进程内实时文档存储。
//!
//! Snapshots are built under the store lock and delivered after it is
//! released. Each listener tracks the sequence number of the last snapshot
//! it saw and drops anything older, so a listener never observes state
//! going backwards.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use ap_core::ports::{
    CollectionPath, CollectionQuery, Direction, Document, DocumentStorePort, FieldUpdate, Fields,
    ListenerRegistration, SnapshotListener, StoreError,
};

struct ListenerEntry {
    query: CollectionQuery,
    listener: Arc<SnapshotListener>,
    last_seq: Arc<Mutex<u64>>,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<CollectionPath, Vec<Document>>,
    listeners: HashMap<u64, ListenerEntry>,
    next_listener_id: u64,
    seq: u64,
    write_failure: Option<StoreError>,
}

type Delivery = (
    Arc<SnapshotListener>,
    Arc<Mutex<u64>>,
    u64,
    Result<Vec<Document>, StoreError>,
);

impl StoreState {
    fn snapshot(&self, query: &CollectionQuery) -> Vec<Document> {
        let mut docs = self
            .collections
            .get(&query.path)
            .cloned()
            .unwrap_or_default();
        if let Some(order) = &query.order_by {
            docs.sort_by(|a, b| {
                let ord = compare_field(a.fields.get(&order.field), b.fields.get(&order.field));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        docs
    }

    fn pending_for(&mut self, path: &CollectionPath) -> Vec<Delivery> {
        self.seq += 1;
        let seq = self.seq;
        self.listeners
            .values()
            .filter(|entry| &entry.query.path == path)
            .map(|entry| {
                (
                    entry.listener.clone(),
                    entry.last_seq.clone(),
                    seq,
                    Ok(self.snapshot(&entry.query)),
                )
            })
            .collect()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        match &self.write_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Missing values sort before present ones in ascending order.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn dispatch(deliveries: Vec<Delivery>) {
    for (listener, last_seq, seq, snapshot) in deliveries {
        let mut last = last_seq.lock().unwrap_or_else(PoisonError::into_inner);
        if seq <= *last {
            debug!(seq, last = *last, "dropping stale snapshot");
            continue;
        }
        *last = seq;
        listener(snapshot);
    }
}

fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..20].to_string()
}

/// In-memory [`DocumentStorePort`].
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a listener error to every listener on `path`.
    pub fn inject_listener_error(&self, path: &CollectionPath, error: StoreError) {
        let deliveries: Vec<Delivery> = {
            let mut state = self.lock();
            state.seq += 1;
            let seq = state.seq;
            state
                .listeners
                .values()
                .filter(|entry| &entry.query.path == path)
                .map(|entry| {
                    (
                        entry.listener.clone(),
                        entry.last_seq.clone(),
                        seq,
                        Err(error.clone()),
                    )
                })
                .collect()
        };
        dispatch(deliveries);
    }

    /// Make every subsequent write fail with `error` (`None` restores writes).
    pub fn fail_writes(&self, error: Option<StoreError>) {
        self.lock().write_failure = error;
    }

    /// Insert a raw document with a chosen id, notifying listeners.
    pub fn put_raw(&self, path: &CollectionPath, document: Document) {
        let deliveries = {
            let mut state = self.lock();
            let docs = state.collections.entry(path.clone()).or_default();
            docs.retain(|doc| doc.id != document.id);
            docs.push(document);
            state.pending_for(path)
        };
        dispatch(deliveries);
    }

    pub fn documents(&self, path: &CollectionPath) -> Vec<Document> {
        self.lock()
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

struct MemoryRegistration {
    id: u64,
    state: Weak<Mutex<StoreState>>,
}

impl ListenerRegistration for MemoryRegistration {
    fn remove(&self) {
        if let Some(state) = self.state.upgrade() {
            let removed = state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .remove(&self.id);
            if removed.is_some() {
                debug!(listener_id = self.id, "listener removed");
            }
        }
    }
}

fn apply_update(doc: &mut Document, update: FieldUpdate) -> Result<(), StoreError> {
    match update {
        FieldUpdate::Set { field, value } => {
            doc.fields.insert(field, value);
        }
        FieldUpdate::Increment { field, by } => {
            let current = match doc.fields.get(&field) {
                None | Some(Value::Null) => 0,
                Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                    StoreError::Rejected(format!("{field} is not an integer"))
                })?,
                Some(_) => {
                    return Err(StoreError::Rejected(format!("{field} is not numeric")));
                }
            };
            doc.fields.insert(field, Value::from(current + by));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    fn listen(
        &self,
        query: CollectionQuery,
        listener: SnapshotListener,
    ) -> Result<Box<dyn ListenerRegistration>, StoreError> {
        let listener = Arc::new(listener);
        let last_seq = Arc::new(Mutex::new(0));
        let (id, initial) = {
            let mut state = self.lock();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.seq += 1;
            let initial = (
                listener.clone(),
                last_seq.clone(),
                state.seq,
                Ok(state.snapshot(&query)),
            );
            debug!(listener_id = id, path = %query.path, "listener registered");
            state.listeners.insert(
                id,
                ListenerEntry {
                    query,
                    listener,
                    last_seq,
                },
            );
            (id, initial)
        };
        dispatch(vec![initial]);

        Ok(Box::new(MemoryRegistration {
            id,
            state: Arc::downgrade(&self.state),
        }))
    }

    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let mut ids = self.batch_add(path, vec![fields]).await?;
        ids.pop()
            .ok_or_else(|| StoreError::Rejected("empty write".to_string()))
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<(), StoreError> {
        let deliveries = {
            let mut state = self.lock();
            state.check_writable()?;
            let doc = state
                .collections
                .get_mut(path)
                .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
                .ok_or_else(|| StoreError::NotFound(format!("{path}/{id}")))?;
            // Apply to a copy so a rejected update leaves the document untouched.
            let mut updated = doc.clone();
            for update in updates {
                apply_update(&mut updated, update)?;
            }
            *doc = updated;
            state.pending_for(path)
        };
        dispatch(deliveries);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
        let deliveries = {
            let mut state = self.lock();
            state.check_writable()?;
            let docs = state.collections.entry(path.clone()).or_default();
            let before = docs.len();
            docs.retain(|doc| doc.id != id);
            if docs.len() == before {
                warn!(path = %path, id, "delete of missing document");
                return Ok(());
            }
            state.pending_for(path)
        };
        dispatch(deliveries);
        Ok(())
    }

    async fn is_empty(&self, path: &CollectionPath) -> Result<bool, StoreError> {
        Ok(self
            .lock()
            .collections
            .get(path)
            .map_or(true, |docs| docs.is_empty()))
    }

    async fn batch_add(
        &self,
        path: &CollectionPath,
        documents: Vec<Fields>,
    ) -> Result<Vec<String>, StoreError> {
        let (ids, deliveries) = {
            let mut state = self.lock();
            state.check_writable()?;
            let docs = state.collections.entry(path.clone()).or_default();
            let mut ids = Vec::with_capacity(documents.len());
            for fields in documents {
                let id = new_document_id();
                ids.push(id.clone());
                docs.push(Document { id, fields });
            }
            (ids, state.pending_for(path))
        };
        dispatch(deliveries);
        Ok(ids)
    }
}
