use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PostId;

/// Store field names of a post document.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const CREATED_AT: &str = "createdAt";
    pub const CATEGORY: &str = "category";
    pub const VIEWS: &str = "views";
}

/// A published blog post as delivered by the post stream.
///
/// `views` only grows, and only through the view-increment write; the
/// local copy changes when the next snapshot arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub image_url: String,
    /// ISO-8601 timestamp string, as stored.
    pub created_at: String,
    pub category: String,
    #[serde(default)]
    pub views: u64,
}

impl Post {
    /// Parsed creation time, `None` when the stored string is not RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Field of a post draft, used to report what is still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Content,
    ImageUrl,
    Category,
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DraftField::Title => "title",
            DraftField::Content => "content",
            DraftField::ImageUrl => "image url",
            DraftField::Category => "category",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("post draft is missing: {}", join_fields(.0))]
    MissingFields(Vec<DraftField>),
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Editable post fields of the create-post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub category: String,
}

impl PostDraft {
    pub fn missing_fields(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(DraftField::Title);
        }
        if self.content.is_empty() {
            missing.push(DraftField::Content);
        }
        if self.image_url.is_empty() {
            missing.push(DraftField::ImageUrl);
        }
        if self.category.is_empty() {
            missing.push(DraftField::Category);
        }
        missing
    }

    /// Save is enabled only when every field is non-empty.
    pub fn can_save(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn to_new_post(&self) -> Result<NewPost, DraftError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DraftError::MissingFields(missing));
        }
        Ok(NewPost {
            title: self.title.clone(),
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            category: self.category.clone(),
        })
    }
}

/// Validated input of the create-post write. Only obtainable from a
/// complete [`PostDraft`], so every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    title: String,
    content: String,
    image_url: String,
    category: String,
}

impl NewPost {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl TryFrom<PostDraft> for NewPost {
    type Error = DraftError;

    fn try_from(draft: PostDraft) -> Result<Self, Self::Error> {
        draft.to_new_post()
    }
}
