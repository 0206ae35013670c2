//! Raw document <-> typed record mapping.

use serde_json::Value;

use ap_core::ports::{Document, Fields, StoreError};
use ap_core::post::{fields, NewPost, Post};
use ap_core::todo::Todo;

fn decode<T: serde::de::DeserializeOwned>(doc: &Document) -> Result<T, StoreError> {
    let mut fields = doc.fields.clone();
    fields.insert("id".to_string(), Value::String(doc.id.clone()));
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::Malformed {
        id: doc.id.clone(),
        reason: e.to_string(),
    })
}

/// The store id always wins over any `id` field inside the document.
pub fn post_from_document(doc: &Document) -> Result<Post, StoreError> {
    decode(doc)
}

pub fn todo_from_document(doc: &Document) -> Result<Todo, StoreError> {
    decode(doc)
}

/// Fields written for a new post.
pub fn post_to_fields(post: &NewPost, created_at: String) -> Fields {
    let mut out = Fields::new();
    out.insert(fields::TITLE.into(), post.title().into());
    out.insert(fields::CONTENT.into(), post.content().into());
    out.insert(fields::IMAGE_URL.into(), post.image_url().into());
    out.insert(fields::CATEGORY.into(), post.category().into());
    out.insert(fields::CREATED_AT.into(), created_at.into());
    out.insert(fields::VIEWS.into(), 0.into());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        match value {
            Value::Object(fields) => Document::new(id, fields),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn post_maps_with_store_id() {
        let post = post_from_document(&doc(
            "abc",
            json!({
                "id": "ignored",
                "title": "T",
                "content": "C",
                "imageUrl": "https://img",
                "createdAt": "2024-05-01T10:00:00.000Z",
                "category": "AI",
                "views": 7
            }),
        ))
        .unwrap();
        assert_eq!(post.id.as_str(), "abc");
        assert_eq!(post.image_url, "https://img");
        assert_eq!(post.views, 7);
    }

    #[test]
    fn post_without_views_starts_at_zero() {
        let post = post_from_document(&doc(
            "p",
            json!({
                "title": "T", "content": "C", "imageUrl": "i",
                "createdAt": "2024-05-01T10:00:00.000Z", "category": "AI"
            }),
        ))
        .unwrap();
        assert_eq!(post.views, 0);
    }

    #[test]
    fn post_missing_title_is_malformed() {
        let err = post_from_document(&doc("p", json!({"content": "C"}))).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref id, .. } if id == "p"));
    }

    #[test]
    fn todo_maps() {
        let todo = todo_from_document(&doc("t1", json!({"text": "buy milk"}))).unwrap();
        assert_eq!(todo.id.as_str(), "t1");
        assert!(!todo.completed);
    }
}
