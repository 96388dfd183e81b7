use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use medimind_chat::{MediMindError, OrchestratorSettings, RetryPolicy};
use medimind_llm_api::{normalize_api_url, ClientSettings, DEFAULT_TIMEOUT, GROQ_API_URL};
use medimind_logging::{get_logs_dir, mask_api_key};
use medimind_types::{
    DEFAULT_ASSISTANT_NAME, DEFAULT_TEXT_MODEL, DEFAULT_USER_NAME, DEFAULT_VISION_MODEL,
    MAX_RETRIES,
};

use crate::cli::Cli;

/// Value shipped in the sample .env; treated the same as a missing key
pub const API_KEY_PLACEHOLDER: &str = "YOUR_GROQ_API_KEY";

/// Upper bound accepted for `--max-attempts` / `MEDIMIND_MAX_ATTEMPTS`
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Everything the application needs, resolved once at startup.
///
/// Precedence: CLI flag > environment (including .env) > default.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub assistant_name: String,
    pub user_name: String,
    pub data_dir: PathBuf,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub log_requests: bool,
}

impl Config {
    /// Resolve against the process environment
    pub fn from_env(cli: &Cli) -> Result<Self, MediMindError> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    /// Resolve with `lookup` standing in for the environment
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Self, MediMindError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty variables count as unset
        let env = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env("GroqAPIKey"))
            .or_else(|| env("GROQ_API_KEY"))
            .unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(MediMindError::Configuration(
                "no API key set; pass --api-key or set GroqAPIKey in .env".to_string(),
            ));
        }
        if api_key.trim() == API_KEY_PLACEHOLDER {
            return Err(MediMindError::Configuration(format!(
                "API key is still the {} placeholder; put your Groq key in .env",
                API_KEY_PLACEHOLDER
            )));
        }

        let api_url = cli
            .api_url
            .clone()
            .or_else(|| env("MEDIMIND_API_URL"))
            .map(|url| normalize_api_url(&url))
            .unwrap_or_else(|| GROQ_API_URL.to_string());

        let timeout = match cli.timeout {
            Some(secs) => Duration::from_secs(secs),
            None => match env("MEDIMIND_TIMEOUT_SECS") {
                Some(raw) => Duration::from_secs(parse_number(&raw, "MEDIMIND_TIMEOUT_SECS")?),
                None => DEFAULT_TIMEOUT,
            },
        };
        if timeout.is_zero() {
            return Err(MediMindError::Configuration(
                "timeout must be at least one second".to_string(),
            ));
        }

        let max_attempts = match cli.max_attempts {
            Some(n) => n,
            None => match env("MEDIMIND_MAX_ATTEMPTS") {
                Some(raw) => parse_number(&raw, "MEDIMIND_MAX_ATTEMPTS")?,
                None => MAX_RETRIES,
            },
        };
        if !(1..=MAX_ATTEMPTS_LIMIT).contains(&max_attempts) {
            return Err(MediMindError::Configuration(format!(
                "max attempts must be between 1 and {}, got {}",
                MAX_ATTEMPTS_LIMIT, max_attempts
            )));
        }

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env("MEDIMIND_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| default_data_dir(&env));

        Ok(Self {
            api_key: api_key.trim().to_string(),
            api_url,
            text_model: cli
                .model
                .clone()
                .or_else(|| env("MEDIMIND_MODEL"))
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            vision_model: cli
                .vision_model
                .clone()
                .or_else(|| env("MEDIMIND_VISION_MODEL"))
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            assistant_name: cli
                .assistant_name
                .clone()
                .or_else(|| env("Assistantname"))
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
            user_name: cli
                .user_name
                .clone()
                .or_else(|| env("Username"))
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            data_dir,
            timeout,
            max_attempts,
            log_requests: cli.log_requests,
        })
    }

    pub fn client_settings(&self) -> Result<ClientSettings> {
        let mut settings = ClientSettings::new(self.api_key.clone())
            .with_api_url(&self.api_url)
            .with_timeout(self.timeout);
        settings.text_model = self.text_model.clone();
        settings.vision_model = self.vision_model.clone();
        if self.log_requests {
            settings.request_log_dir = Some(get_logs_dir()?);
        }
        Ok(settings)
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            assistant_name: self.assistant_name.clone(),
            user_name: self.user_name.clone(),
            data_dir: self.data_dir.clone(),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                ..RetryPolicy::default()
            },
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("api_url", &self.api_url)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("assistant_name", &self.assistant_name)
            .field("user_name", &self.user_name)
            .field("data_dir", &self.data_dir)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("log_requests", &self.log_requests)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, MediMindError> {
    raw.parse().map_err(|_| {
        MediMindError::Configuration(format!("{} must be a whole number, got {:?}", name, raw))
    })
}

/// ~/.medimind/Data, or ./Data when no home directory is known
fn default_data_dir(env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    env("HOME")
        .or_else(|| env("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".medimind").join("Data"))
        .unwrap_or_else(|| PathBuf::from("Data"))
}
