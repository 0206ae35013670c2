//! Collection stream adapters.
//!
//! Each adapter registers a store listener, maps every raw snapshot to typed
//! records and hands the complete list to the callback. Consumers replace
//! their copy on every call; nothing here is a delta.
//!
//! 集合流适配器：每次回调都是完整快照。

mod mapping;
mod posts;
mod todos;

use std::sync::Arc;

use tracing::{error, warn};

use ap_core::ports::{CollectionQuery, Document, DocumentStorePort, StoreError};
use ap_core::stream::{DeliveryGate, Subscription};

pub use mapping::{post_from_document, post_to_fields, todo_from_document};
pub use posts::subscribe_posts;
pub use todos::subscribe_todos;

/// Register `query` and deliver mapped snapshots until unsubscribed.
///
/// Documents that fail to map are skipped with a warning. Listener errors
/// are logged and the callback is not invoked, so the consumer keeps its
/// last snapshot.
pub(crate) fn subscribe_collection<T, M, F>(
    store: &dyn DocumentStorePort,
    stream: &'static str,
    query: CollectionQuery,
    map: M,
    on_snapshot: F,
) -> Subscription
where
    T: 'static,
    M: Fn(&Document) -> Result<T, StoreError> + Send + Sync + 'static,
    F: Fn(Vec<T>) + Send + Sync + 'static,
{
    let gate = DeliveryGate::new();
    let delivery_gate = Arc::clone(&gate);
    let path = query.path.clone();

    let listener = Box::new(move |snapshot: Result<Vec<Document>, StoreError>| {
        let documents = match snapshot {
            Ok(documents) => documents,
            Err(err) => {
                error!(stream, error = %err, "snapshot listener failed, keeping last snapshot");
                return;
            }
        };
        let items: Vec<T> = documents
            .iter()
            .filter_map(|doc| match map(doc) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(stream, id = %doc.id, error = %err, "skipping malformed document");
                    None
                }
            })
            .collect();
        delivery_gate.deliver(|| on_snapshot(items));
    });

    match store.listen(query, listener) {
        Ok(registration) => Subscription::new(gate, move || registration.remove()),
        Err(err) => {
            error!(stream, path = %path, error = %err, "failed to register listener");
            Subscription::inert()
        }
    }
}
