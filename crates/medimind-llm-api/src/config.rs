use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use medimind_logging::mask_api_key;
use medimind_types::{DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};

/// Default Groq API URL
pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Output token cap for both text and vision requests
pub const MAX_TOKENS: u32 = 1024;

/// Sampling temperature for text completions
pub const TEMPERATURE: f32 = 0.7;

/// Nucleus sampling for text completions
pub const TOP_P: f32 = 1.0;

/// Upper bound on a single request, including reading the whole stream
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`crate::GroqClient`]
#[derive(Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub api_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub timeout: Duration,
    /// When set, request bodies (and non-streamed responses) are written here
    pub request_log_dir: Option<PathBuf>,
}

impl ClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: GROQ_API_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            request_log_dir: None,
        }
    }

    pub fn with_api_url(mut self, url: impl AsRef<str>) -> Self {
        self.api_url = normalize_api_url(url.as_ref());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("api_url", &self.api_url)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("timeout", &self.timeout)
            .field("request_log_dir", &self.request_log_dir)
            .finish()
    }
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    if url.ends_with('/') {
        format!("{}v1/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}
