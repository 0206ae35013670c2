//! ID type wrappers for type safety.
//!
//! Store-assigned identifiers stay opaque strings; the wrappers only keep a
//! post id from being passed where a todo id is expected.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Identifier of a document in the post collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

/// Identifier of a todo inside one user's partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

/// Owner key of a todo partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Market-data coin identifier (e.g. `bitcoin`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl_id!(PostId, TodoId, UserId, CoinId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_from_str_keeps_value() {
        let id: PostId = "post-1".into();
        assert_eq!(id.as_str(), "post-1");
        assert_eq!(id.to_string(), "post-1");
    }

    #[test]
    fn test_store_assigned_id_round_trips_unchanged() {
        let raw = String::from("Xq3-9fZ_store");
        let id = TodoId::from(raw.clone());
        assert_eq!(id.as_str(), raw);
        assert_eq!(id.to_string(), raw);
        assert_eq!(serde_json::from_str::<TodoId>(&format!("\"{raw}\"")).unwrap(), id);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&CoinId::from("bitcoin")).unwrap();
        assert_eq!(json, "\"bitcoin\"");
    }
}
