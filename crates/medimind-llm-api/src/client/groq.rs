use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, warn};

use medimind_logging::{log_request_to_file, log_response_to_file, request_timestamp};
use medimind_models::{ChatRequest, ChatResponse, VisionRequest};
use medimind_types::Message;

use crate::client::streaming::{SseDecoder, SseEvent, StreamAggregator};
use crate::client::CompletionClient;
use crate::config::{ClientSettings, MAX_TOKENS, TEMPERATURE, TOP_P};
use crate::error::RemoteError;
use crate::image::ImagePayload;

/// Groq (OpenAI-compatible) chat-completions client
pub struct GroqClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl GroqClient {
    pub fn new(settings: ClientSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(RemoteError::Network)?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn map_transport(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.settings.timeout)
        } else {
            RemoteError::Network(err)
        }
    }

    async fn post<T: Serialize>(
        &self,
        request: &T,
        model: &str,
        timestamp: &str,
    ) -> Result<reqwest::Response, RemoteError> {
        if let Some(dir) = &self.settings.request_log_dir {
            let logged = log_request_to_file(
                dir,
                &self.settings.api_url,
                request,
                model,
                &self.settings.api_key,
                timestamp,
            );
            if let Err(e) = logged {
                warn!("failed to log request: {:#}", e);
            }
        }

        let response = self.client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            self.log_response(status, &body, model, timestamp);
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn log_response(&self, status: reqwest::StatusCode, body: &str, model: &str, timestamp: &str) {
        if let Some(dir) = &self.settings.request_log_dir {
            if let Err(e) = log_response_to_file(dir, status, body, model, timestamp) {
                warn!("failed to log response: {:#}", e);
            }
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, RemoteError> {
        let request = ChatRequest {
            model: self.settings.text_model.clone(),
            messages: messages.to_vec(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: true,
            stop: None,
        };
        debug!(model = %request.model, messages = messages.len(), "sending streamed completion");

        let response = self.post(&request, &request.model, &request_timestamp()).await?;

        let mut decoder = SseDecoder::new();
        let mut aggregator = StreamAggregator::new();
        let mut stream = response.bytes_stream();
        let mut done = false;

        'read: while let Some(chunk_result) = stream.next().await {
            let bytes = chunk_result.map_err(|e| self.map_transport(e))?;
            for event in decoder.push(&bytes)? {
                match event {
                    SseEvent::Data(data) => aggregator.accept(&data)?,
                    SseEvent::Done => {
                        done = true;
                        break 'read;
                    }
                }
            }
        }

        if !done {
            for event in decoder.finish()? {
                if let SseEvent::Data(data) = event {
                    aggregator.accept(&data)?;
                }
            }
            debug!("stream ended without [DONE] marker");
        }

        debug!(chunks = aggregator.chunk_count(), "stream completed");
        Ok(aggregator.finish())
    }

    async fn describe_image(
        &self,
        prompt: &str,
        image: &ImagePayload,
    ) -> Result<String, RemoteError> {
        let request = VisionRequest::new(
            self.settings.vision_model.clone(),
            prompt,
            image.to_data_url(),
            MAX_TOKENS,
        );
        debug!(model = %request.model, image_bytes = image.len(), "sending vision request");

        let timestamp = request_timestamp();
        let response = self.post(&request, &request.model, &timestamp).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        self.log_response(status, &body, &request.model, &timestamp);

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| RemoteError::MalformedResponse(format!("{}: {}", e, body)))?;

        parsed
            .first_content()
            .ok_or_else(|| RemoteError::MalformedResponse("No content in response".to_string()))
    }
}
