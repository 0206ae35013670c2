//! Ports implemented by infrastructure adapters.

mod clock;
mod document_store;
mod generative;
mod market_data;

pub use clock::ClockPort;
pub use document_store::{
    CollectionPath, CollectionQuery, Direction, Document, DocumentStorePort, FieldUpdate, Fields,
    ListenerRegistration, OrderBy, SnapshotListener, StoreError, POSTS_COLLECTION,
    TODOS_COLLECTION, USERS_COLLECTION,
};
pub use generative::{GenerationError, GenerationTask, GenerativePort};
pub use market_data::MarketDataPort;
