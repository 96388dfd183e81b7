//! Conversation layer for medimind: the persisted chat log, prompt
//! assembly, and the orchestrator that answers queries against a
//! [`medimind_llm_api::CompletionClient`].

pub mod answer;
pub mod context;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod prompts;
pub mod store;

pub use answer::clean_answer;
pub use context::{
    build_persona, image_context_prefix, realtime_information, realtime_information_at,
    recent_context_prompt, ContextBuilder,
};
pub use error::{MediMindError, Result, StorageError};
pub use extract::TextExtractor;
pub use orchestrator::{Orchestrator, OrchestratorSettings, RetryPolicy, MAX_BACKOFF};
pub use store::{render_transcript, write_transcript, ChatLogStore, CHAT_LOG_FILE};
