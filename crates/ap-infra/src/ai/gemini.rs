//! Gemini generative gateway.
//!
//! Text tasks go through `models/{text_model}:generateContent`, images through
//! `models/{image_model}:predict`. No retries: any failure becomes a
//! [`GenerationError`] whose message is shown to the user as is.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info_span, warn, Instrument};

use ap_core::ports::{GenerationError, GenerationTask, GenerativePort};
use ap_core::research::{SearchResult, Source};

use super::wire::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, GoogleSearch,
    PredictInstance, PredictParameters, PredictRequest, PredictResponse, Tool,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

fn ideas_prompt(topic: &str) -> String {
    format!(
        "Generate 5 catchy and engaging blog post titles about \"{topic}\". \
         Return them as a JSON array of strings."
    )
}

fn content_prompt(title: &str) -> String {
    format!(
        "Write a well-structured, engaging blog post with the title \"{title}\". \
         Use markdown: '#', '##' and '###' headings, **bold** and *italic* emphasis, \
         and blank lines between paragraphs."
    )
}

fn image_prompt(title: &str) -> String {
    format!(
        "A visually stunning, high-quality header image for a blog post titled \"{title}\". \
         Digital art, vibrant colors, no text."
    )
}

fn research_prompt(query: &str) -> String {
    format!("Provide a concise, well-organized summary answering: {query}")
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self::with_client(http, settings))
    }

    pub fn with_client(http: reqwest::Client, mut settings: GeminiSettings) -> Self {
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        Self { http, settings }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        task: GenerationTask,
        model: &str,
        method: &str,
        body: &B,
    ) -> Result<T, GenerationError> {
        let url = format!("{}/models/{}:{}", self.settings.base_url, model, method);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.settings.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| fail(task, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(task, format!("unexpected status {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| fail(task, format!("invalid body: {e}")))
    }

    async fn generate_text(
        &self,
        task: GenerationTask,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        self.post(task, &self.settings.text_model, "generateContent", &request)
            .await
    }
}

fn fail(task: GenerationTask, reason: String) -> GenerationError {
    warn!(?task, %reason, "generation failed");
    GenerationError::new(task, reason)
}

fn first_text(
    task: GenerationTask,
    response: &GenerateContentResponse,
) -> Result<String, GenerationError> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.text())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(fail(task, "response has no text".to_string()));
    }
    Ok(text.to_string())
}

/// Grounding sources in order, first occurrence of each uri wins.
fn grounding_sources(response: &GenerateContentResponse) -> Vec<Source> {
    let mut seen = HashSet::new();
    response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|meta| meta.grounding_chunks.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            seen.insert(uri.to_string()).then(|| Source {
                uri: uri.to_string(),
                title: web.title.clone().unwrap_or_else(|| uri.to_string()),
            })
        })
        .collect()
}

#[async_trait]
impl GenerativePort for GeminiClient {
    async fn generate_ideas(&self, topic: &str) -> Result<Vec<String>, GenerationError> {
        let task = GenerationTask::Ideas;
        let mut request = GenerateContentRequest::prompt(ideas_prompt(topic));
        request.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: serde_json::json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }),
        });

        let response = self
            .generate_text(task, request)
            .instrument(info_span!("gemini.generate_ideas", topic))
            .await?;
        let text = first_text(task, &response)?;
        let ideas: Vec<String> = serde_json::from_str(&text)
            .map_err(|e| fail(task, format!("ideas are not a JSON string array: {e}")))?;
        Ok(ideas
            .into_iter()
            .map(|idea| idea.trim().to_string())
            .filter(|idea| !idea.is_empty())
            .collect())
    }

    async fn generate_content(&self, title: &str) -> Result<String, GenerationError> {
        let task = GenerationTask::Content;
        let response = self
            .generate_text(task, GenerateContentRequest::prompt(content_prompt(title)))
            .instrument(info_span!("gemini.generate_content", title))
            .await?;
        first_text(task, &response)
    }

    async fn generate_image(&self, title: &str) -> Result<String, GenerationError> {
        let task = GenerationTask::Image;
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: image_prompt(title),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9".to_string(),
            },
        };
        let response: PredictResponse = self
            .post(task, &self.settings.image_model, "predict", &request)
            .instrument(info_span!("gemini.generate_image", title))
            .await?;

        let encoded = response
            .predictions
            .first()
            .and_then(|p| p.bytes_base64_encoded.as_deref())
            .filter(|b| !b.is_empty())
            .ok_or_else(|| fail(task, "response has no image".to_string()))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| fail(task, format!("image is not valid base64: {e}")))?;
        Ok(format!("data:image/png;base64,{encoded}"))
    }

    async fn research(&self, query: &str) -> Result<SearchResult, GenerationError> {
        let task = GenerationTask::Research;
        let mut request = GenerateContentRequest::prompt(research_prompt(query));
        request.tools = Some(vec![Tool {
            google_search: GoogleSearch {},
        }]);

        let response = self
            .generate_text(task, request)
            .instrument(info_span!("gemini.research", query))
            .await?;
        let summary = first_text(task, &response)?;
        Ok(SearchResult {
            query: query.to_string(),
            summary,
            sources: grounding_sources(&response),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn client(server: &ServerGuard) -> GeminiClient {
        let mut settings = GeminiSettings::new("test-key");
        settings.base_url = server.url();
        settings.text_model = "text-model".into();
        settings.image_model = "image-model".into();
        GeminiClient::new(settings).unwrap()
    }

    fn text_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn ideas_parse_json_array_and_request_json_output() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_body(text_body(r#"["One", " Two ", ""]"#))
            .create_async()
            .await;

        let ideas = client(&server).generate_ideas("rust").await.unwrap();

        mock.assert_async().await;
        assert_eq!(ideas, vec!["One".to_string(), "Two".to_string()]);
    }

    #[tokio::test]
    async fn ideas_that_are_not_json_fail_with_user_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(text_body("here are some ideas"))
            .create_async()
            .await;

        let err = client(&server).generate_ideas("rust").await.unwrap_err();
        assert_eq!(err.task, GenerationTask::Ideas);
        assert_eq!(
            err.to_string(),
            "Failed to generate post ideas. Please try again."
        );
    }

    #[tokio::test]
    async fn content_is_trimmed_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(text_body("\n# Title\n\nBody\n"))
            .create_async()
            .await;

        let content = client(&server).generate_content("Title").await.unwrap();
        assert_eq!(content, "# Title\n\nBody");
    }

    #[tokio::test]
    async fn server_error_becomes_generation_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server).generate_content("t").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate post content. Please try again."
        );
        assert!(err.reason.contains("500"));
    }

    #[tokio::test]
    async fn image_is_returned_as_data_uri() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/image-model:predict")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "parameters": {"sampleCount": 1, "aspectRatio": "16:9"}
            })))
            .with_status(200)
            .with_body(r#"{"predictions":[{"bytesBase64Encoded":"aGVsbG8=","mimeType":"image/png"}]}"#)
            .create_async()
            .await;

        let uri = client(&server).generate_image("t").await.unwrap();
        mock.assert_async().await;
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn missing_prediction_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/image-model:predict")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"predictions":[]}"#)
            .create_async()
            .await;

        let err = client(&server).generate_image("t").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate image. Please try again.");
    }

    #[tokio::test]
    async fn research_collects_deduplicated_sources() {
        let mut server = Server::new_async().await;
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "Summary "}, {"text": "text."}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a", "title": "A"}},
                    {"web": {"uri": "https://b", "title": "B"}},
                    {"web": {"uri": "https://a", "title": "A again"}},
                    {"web": {"title": "no uri"}},
                    {}
                ]}
            }]
        });
        let mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(
                serde_json::json!({"tools": [{"google_search": {}}]}),
            ))
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let result = client(&server).research("what is rust").await.unwrap();
        mock.assert_async().await;
        assert_eq!(result.query, "what is rust");
        assert_eq!(result.summary, "Summary text.");
        let uris: Vec<_> = result.sources.iter().map(|s| s.uri.as_str()).collect();
        assert_eq!(uris, vec!["https://a", "https://b"]);
        assert_eq!(result.sources[0].title, "A");
    }

    #[tokio::test]
    async fn research_without_candidates_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/text-model:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let err = client(&server).research("q").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to perform research. Please try again.");
    }
}
