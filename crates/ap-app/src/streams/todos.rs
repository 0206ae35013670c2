use ap_core::ids::UserId;
use ap_core::ports::{CollectionPath, CollectionQuery, DocumentStorePort};
use ap_core::stream::Subscription;
use ap_core::todo::Todo;

use super::{mapping::todo_from_document, subscribe_collection};

/// One user's todos, in store order. Display sorting happens downstream.
pub fn subscribe_todos<F>(store: &dyn DocumentStorePort, uid: &UserId, on_snapshot: F) -> Subscription
where
    F: Fn(Vec<Todo>) + Send + Sync + 'static,
{
    let query = CollectionQuery::collection(CollectionPath::todos(uid.as_str()));
    subscribe_collection(store, "todos", query, todo_from_document, on_snapshot)
}
