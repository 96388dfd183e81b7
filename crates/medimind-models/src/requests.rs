use medimind_types::{Message, Role};
use serde::Serialize;

/// Streaming chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
    /// Always serialized, as `null` when unset
    pub stop: Option<Vec<String>>,
}

/// Non-streaming multimodal request carrying a single user message
#[derive(Debug, Clone, Serialize)]
pub struct VisionRequest {
    pub model: String,
    pub messages: Vec<VisionMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisionMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// One part of a multimodal message body
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl VisionRequest {
    /// Build a request with one user message holding `prompt` followed by the image
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        image_data_url: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![VisionMessage {
                role: Role::User,
                content: vec![
                    ContentPart::Text { text: prompt.into() },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image_data_url.into() },
                    },
                ],
            }],
            max_tokens,
        }
    }
}
