mod gemini;
mod wire;

pub use gemini::{
    GeminiClient, GeminiSettings, DEFAULT_GEMINI_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
