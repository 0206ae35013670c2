use ap_core::ports::{CollectionPath, CollectionQuery, Direction, DocumentStorePort};
use ap_core::post::{fields, Post};
use ap_core::stream::Subscription;

use super::{mapping::post_from_document, subscribe_collection};

/// Global post stream, newest first. The ordering comes from the store query.
pub fn subscribe_posts<F>(store: &dyn DocumentStorePort, on_snapshot: F) -> Subscription
where
    F: Fn(Vec<Post>) + Send + Sync + 'static,
{
    let query = CollectionQuery::collection(CollectionPath::posts())
        .ordered_by(fields::CREATED_AT, Direction::Descending);
    subscribe_collection(store, "posts", query, post_from_document, on_snapshot)
}
