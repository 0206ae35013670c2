//! AI-assisted post composition
//! AI 辅助写作

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use ap_core::ports::{GenerationError, GenerativePort};

/// Title ideas, body text and header image for the create-post form.
///
/// Errors are passed through untouched: their `Display` is what the form
/// shows.
pub struct ComposePost {
    generative: Arc<dyn GenerativePort>,
}

impl ComposePost {
    pub fn new(generative: Arc<dyn GenerativePort>) -> Self {
        Self { generative }
    }

    pub async fn ideas(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        async {
            let ideas = self.generative.generate_ideas(topic).await?;
            info!(count = ideas.len(), "ideas generated");
            Ok(ideas)
        }
        .instrument(info_span!("usecase.compose.ideas", topic))
        .await
    }

    pub async fn content(&self, title: &str) -> Result<String, GenerationError> {
        self.generative
            .generate_content(title)
            .instrument(info_span!("usecase.compose.content", title))
            .await
    }

    pub async fn image(&self, title: &str) -> Result<String, GenerationError> {
        self.generative
            .generate_image(title)
            .instrument(info_span!("usecase.compose.image", title))
            .await
    }
}
