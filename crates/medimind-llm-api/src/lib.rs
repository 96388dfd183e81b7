//! # medimind-llm-api
//!
//! Client for the hosted chat-completion endpoint used by medimind.
//!
//! ## Features
//!
//! - **Streaming text completions**: server-sent events are aggregated into a
//!   single answer, in arrival order, with the `</s>` marker removed
//! - **Vision requests**: one prompt plus one base64 image, non-streaming
//! - **Local size guard**: images over 4 MiB are rejected before any request
//! - **Bounded requests**: every call carries a timeout
//!
//! ## Example
//!
//! ```rust,no_run
//! use medimind_llm_api::{ClientSettings, CompletionClient, GroqClient};
//! use medimind_types::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::new(ClientSettings::new("gsk_your_key"))?;
//!     let answer = client.complete(&[Message::user("Hello!")]).await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod image;

// Re-export commonly used types
pub use client::{CompletionClient, groq::GroqClient};
pub use client::streaming::{SseDecoder, SseEvent, StreamAggregator};
pub use config::{
    ClientSettings,
    GROQ_API_URL,
    MAX_TOKENS,
    TEMPERATURE,
    TOP_P,
    DEFAULT_TIMEOUT,
    normalize_api_url,
};
pub use error::{ImageError, RemoteError};
pub use image::ImagePayload;
