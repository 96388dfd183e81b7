use async_trait::async_trait;
use medimind_types::Message;

use crate::error::RemoteError;
use crate::image::ImagePayload;

pub mod groq;
pub mod streaming;

/// Completion endpoint as seen by the conversation layer
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Streamed text completion, aggregated into one string with the
    /// end-of-sequence marker removed
    async fn complete(&self, messages: &[Message]) -> Result<String, RemoteError>;

    /// Single non-streamed vision request; returns the first choice's content
    async fn describe_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, RemoteError>;
}
