use async_trait::async_trait;
use serde_json::Value;

/// Raw document fields as stored (JSON field map).
pub type Fields = serde_json::Map<String, Value>;

/// A stored document: store-assigned id plus its fields.
///
/// 文档：存储分配的 id 与字段。
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

pub const POSTS_COLLECTION: &str = "astra_posts";
pub const USERS_COLLECTION: &str = "astra_users";
pub const TODOS_COLLECTION: &str = "astra_todos";

/// Slash-separated collection path, e.g. `astra_users/{uid}/astra_todos`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Global post collection.
    pub fn posts() -> Self {
        Self::new(POSTS_COLLECTION)
    }

    /// Per-user todo sub-collection.
    pub fn todos(uid: &str) -> Self {
        Self(format!("{USERS_COLLECTION}/{uid}/{TODOS_COLLECTION}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Listener query: a collection plus optional server-side ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub path: CollectionPath,
    pub order_by: Option<OrderBy>,
}

impl CollectionQuery {
    pub fn collection(path: CollectionPath) -> Self {
        Self {
            path,
            order_by: None,
        }
    }

    pub fn ordered_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }
}

/// Single-field write applied by [`DocumentStorePort::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Set { field: String, value: Value },
    /// Atomic numeric increment on the store side.
    Increment { field: String, by: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("malformed document {id}: {reason}")]
    Malformed { id: String, reason: String },
}

/// Snapshot callback. Each `Ok` carries the complete collection state.
///
/// 快照回调：每次都是集合的完整状态，不是增量。
pub type SnapshotListener = Box<dyn Fn(Result<Vec<Document>, StoreError>) + Send + Sync>;

/// Handle returned by [`DocumentStorePort::listen`].
pub trait ListenerRegistration: Send + Sync {
    /// Detach the listener. Safe to call more than once.
    fn remove(&self);
}

/// Realtime document store.
///
/// 实时文档存储端口。
///
/// # Behavior / 行为
/// - `listen()` delivers the current snapshot, then one snapshot per change,
///   in the order the store produced them.
/// - Writes are visible to listeners of the affected collection.
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    fn listen(
        &self,
        query: CollectionQuery,
        listener: SnapshotListener,
    ) -> Result<Box<dyn ListenerRegistration>, StoreError>;

    /// Insert a document and return its store-assigned id.
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<String, StoreError>;

    async fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<(), StoreError>;

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError>;

    async fn is_empty(&self, path: &CollectionPath) -> Result<bool, StoreError>;

    /// Insert many documents as one write.
    async fn batch_add(
        &self,
        path: &CollectionPath,
        documents: Vec<Fields>,
    ) -> Result<Vec<String>, StoreError>;
}
