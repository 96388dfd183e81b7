use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use medimind_llm_api::{CompletionClient, ImagePayload};
use medimind_types::{Message, MAX_RETRIES};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::answer::clean_answer;
use crate::context::{build_persona, image_context_prefix, recent_context_prompt, ContextBuilder};
use crate::error::{MediMindError, Result, StorageError};
use crate::extract::TextExtractor;
use crate::prompts::{
    diagnosis_prompt, prescription_prompt, MEDICAL_IMAGE_INSTRUCTION, MEDICAL_IMAGE_UPLOAD_NOTE,
    NO_TEXT_DETECTED,
};
use crate::store::{write_transcript, ChatLogStore};

/// Longest single wait between `answer` attempts
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bounded retry with exponential backoff for [`Orchestrator::answer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after the given failed attempt (1-based), capped at [`MAX_BACKOFF`]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub assistant_name: String,
    pub user_name: String,
    pub data_dir: PathBuf,
    pub retry: RetryPolicy,
}

/// Owns the chat log and answers queries against a completion client.
///
/// The log is the single source of truth for the conversation; every
/// operation that reads-modifies-writes it holds `log_lock`.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    store: ChatLogStore,
    context: ContextBuilder,
    assistant_name: String,
    retry: RetryPolicy,
    log_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(settings: &OrchestratorSettings, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            store: ChatLogStore::in_dir(&settings.data_dir),
            context: ContextBuilder::new(build_persona(
                &settings.user_name,
                &settings.assistant_name,
            )),
            assistant_name: settings.assistant_name.clone(),
            retry: settings.retry.clone(),
            log_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ChatLogStore {
        &self.store
    }

    pub fn persona(&self) -> &str {
        self.context.persona()
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Answer `query` with the full persisted conversation as context.
    ///
    /// On success the log grows by the user query and the cleaned answer.
    /// Storage and remote faults are retried up to the policy's attempt
    /// limit without modifying the log. A corrupt log is reset and the
    /// attempt repeated once without counting against the limit.
    pub async fn answer(&self, query: &str) -> Result<String> {
        let _guard = self.log_lock.lock().await;
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;
        let mut log_was_reset = false;

        loop {
            let err = match self.exchange(query).await {
                Ok((mut log, answer)) => {
                    log.push(Message::assistant(answer.clone()));
                    self.store.save(&log)?;
                    if attempt > 1 {
                        info!(attempt, "answer succeeded after retry");
                    }
                    return Ok(answer);
                }
                Err(err) => err,
            };

            if let MediMindError::Storage(StorageError::Corrupt { path, .. }) = &err {
                warn!(path = %path.display(), "chat log is corrupt, resetting it");
                self.store.reset()?;
                if !log_was_reset {
                    log_was_reset = true;
                    continue;
                }
            } else if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= max_attempts {
                return Err(MediMindError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.retry.delay_for(attempt);
            warn!(attempt, max_attempts, ?delay, "answer attempt failed: {}", err);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One attempt: load, append the query, send, clean. Nothing is saved.
    async fn exchange(&self, query: &str) -> Result<(Vec<Message>, String)> {
        let mut log = self.store.load()?;
        log.push(Message::user(query));

        let request = self.context.build(&log);
        debug!(history = log.len(), "requesting completion");
        let raw = self.client.complete(&request).await?;

        Ok((log, clean_answer(&raw)))
    }

    /// Ask for a diagnosis and treatment for the described symptoms
    pub async fn diagnose(&self, symptoms: &str) -> Result<String> {
        self.answer(&diagnosis_prompt(symptoms)).await
    }

    /// Ask for medication, dosage and timing from prescription text
    pub async fn parse_prescription(&self, prescription_text: &str) -> Result<String> {
        self.answer(&prescription_prompt(prescription_text)).await
    }

    /// OCR a prescription photo and parse the extracted text
    pub async fn analyze_prescription_image(
        &self,
        image: &Path,
        extractor: &dyn TextExtractor,
    ) -> Result<String> {
        let text = extractor.extract_text(image).await?;
        let text = if text.trim().is_empty() {
            NO_TEXT_DETECTED.to_string()
        } else {
            text
        };
        self.parse_prescription(&text).await
    }

    /// Send a medical image to the vision model.
    ///
    /// Oversized images are rejected before the log is touched or any
    /// request is made. No retry.
    pub async fn analyze_medical_image(&self, image: &Path) -> Result<String> {
        let payload = ImagePayload::from_path(image)?;

        let _guard = self.log_lock.lock().await;
        let mut log = self.store.load()?;
        let prompt = format!("{}{}", image_context_prefix(&log), MEDICAL_IMAGE_INSTRUCTION);

        let result = self.client.describe_image(&prompt, &payload).await?;

        log.push(Message::user(MEDICAL_IMAGE_UPLOAD_NOTE));
        log.push(Message::assistant(result.clone()));
        self.store.save(&log)?;
        Ok(result)
    }

    /// The persisted conversation
    pub async fn history(&self) -> Result<Vec<Message>> {
        let _guard = self.log_lock.lock().await;
        Ok(self.store.load()?)
    }

    /// `query` wrapped with a recap of the most recent exchanges in the log
    pub async fn contextual_prompt(&self, query: &str) -> Result<String> {
        let history = self.history().await?;
        Ok(recent_context_prompt(&history, query))
    }

    /// Forget the conversation
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.log_lock.lock().await;
        self.store.reset()?;
        Ok(())
    }

    /// Write the conversation as a plain-text transcript
    pub async fn export(&self, path: &Path) -> Result<usize> {
        let history = self.history().await?;
        write_transcript(&history, &self.assistant_name, path)?;
        Ok(history.len())
    }
}
