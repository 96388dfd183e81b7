// Logging module - request/response debug logs and shared app directories
pub mod request_logger;

use std::path::PathBuf;
use anyhow::{Result, Context};

// Re-export request logging functions
pub use request_logger::{
    log_request_to_file,
    log_response_to_file,
    log_stream_chunk,
    mask_api_key,
    request_timestamp,
};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Get or create the base medimind directory (~/.medimind)
/// This is shared between the chat log and request logging
pub fn get_app_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let app_dir = PathBuf::from(home_dir).join(".medimind");

    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)
            .context("Failed to create medimind directory")?;
    }

    Ok(app_dir)
}

/// Get or create the logs directory (~/.medimind/logs)
pub fn get_logs_dir() -> Result<PathBuf> {
    let logs_dir = get_app_dir()?.join("logs");

    if !logs_dir.exists() {
        std::fs::create_dir_all(&logs_dir)
            .context("Failed to create logs directory")?;
    }

    Ok(logs_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_short_input_untouched() {
        assert_eq!(safe_truncate("abc", 10), "abc");
    }

    #[test]
    fn test_safe_truncate_multibyte() {
        // must cut on char boundaries, not bytes
        assert_eq!(safe_truncate("💊💊💊💊💊", 4), "💊...");
        assert_eq!(safe_truncate("abcdef", 2), "...");
    }
}
