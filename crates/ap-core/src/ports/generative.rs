use async_trait::async_trait;

use crate::research::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationTask {
    Ideas,
    Content,
    Image,
    Research,
}

impl GenerationTask {
    /// Message shown to the user when the task fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            GenerationTask::Ideas => "Failed to generate post ideas. Please try again.",
            GenerationTask::Content => "Failed to generate post content. Please try again.",
            GenerationTask::Image => "Failed to generate image. Please try again.",
            GenerationTask::Research => "Failed to perform research. Please try again.",
        }
    }
}

/// Generation failure. `Display` is the user-facing message; `reason` is
/// for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .task.failure_message())]
pub struct GenerationError {
    pub task: GenerationTask,
    pub reason: String,
}

impl GenerationError {
    pub fn new(task: GenerationTask, reason: impl Into<String>) -> Self {
        Self {
            task,
            reason: reason.into(),
        }
    }
}

/// Generative text/image/research service.
///
/// 生成式 AI 端口：每次调用都是单次请求，无重试。
#[async_trait]
pub trait GenerativePort: Send + Sync {
    /// Title ideas for a topic.
    async fn generate_ideas(&self, topic: &str) -> Result<Vec<String>, GenerationError>;

    /// Markdown body for a title.
    async fn generate_content(&self, title: &str) -> Result<String, GenerationError>;

    /// Image for a title, as a URI (usually a `data:` URI).
    async fn generate_image(&self, title: &str) -> Result<String, GenerationError>;

    async fn research(&self, query: &str) -> Result<SearchResult, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_user_message() {
        let err = GenerationError::new(GenerationTask::Image, "HTTP 500");
        assert_eq!(err.to_string(), "Failed to generate image. Please try again.");
        assert_eq!(err.reason, "HTTP 500");
    }
}
