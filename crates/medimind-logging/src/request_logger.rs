use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::safe_truncate;

/// Timestamp used to pair request and response log files
pub fn request_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S%.3f").to_string()
}

/// Show only the first 10 characters of an API key
pub fn mask_api_key(api_key: &str) -> String {
    format!("{}***", api_key.chars().take(10).collect::<String>())
}

fn file_stem(prefix: &str, timestamp: &str, model: &str) -> String {
    format!("{}-{}-{}.txt", prefix, timestamp, model.replace('/', "-"))
}

/// Log an HTTP request body to file for persistent debugging
pub fn log_request_to_file<T: Serialize>(
    logs_dir: &Path,
    url: &str,
    request: &T,
    model: &str,
    api_key: &str,
    timestamp: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_path = logs_dir.join(file_stem("req", timestamp, model));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        log_content.push_str(&format!("URL: {}\n", url));
        log_content.push_str(&format!("Host: {}\n", parsed_url.host_str().unwrap_or("unknown")));
        let port = match parsed_url.port() {
            Some(p) => p.to_string(),
            None if parsed_url.scheme() == "https" => "443 (default)".to_string(),
            None => "80 (default)".to_string(),
        };
        log_content.push_str(&format!("Port: {}\n", port));
        log_content.push_str(&format!("Scheme: {}\n\n", parsed_url.scheme()));
    } else {
        log_content.push_str(&format!("URL: {}\n\n", url));
    }

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", mask_api_key(api_key)));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    tracing::debug!(path = %file_path.display(), "request logged");
    Ok(file_path)
}

/// Log an HTTP response to file, pretty-printing JSON bodies
pub fn log_response_to_file(
    logs_dir: &Path,
    status: reqwest::StatusCode,
    body: &str,
    model: &str,
    timestamp: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file_path = logs_dir.join(file_stem("resp", timestamp, model));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));
    log_content.push_str(&format!("Status: {} {}\n\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ));

    log_content.push_str("Response Body:\n");
    // Try to pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok());
    log_content.push_str(pretty.as_deref().unwrap_or(body));
    log_content.push('\n');

    log_content.push_str("\n---\n");
    log_content.push_str(&format!("Response Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    tracing::debug!(path = %file_path.display(), "response logged");
    Ok(file_path)
}

/// Trace a single streamed data line
pub fn log_stream_chunk(chunk_num: usize, data: &str) {
    if data.chars().count() > 200 {
        tracing::trace!(chunk = chunk_num, bytes = data.len(), "{}", safe_truncate(data, 200));
    } else {
        tracing::trace!(chunk = chunk_num, "{}", data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_request_log_masks_key() {
        let dir = TempDir::new().unwrap();
        let body = serde_json::json!({"model": "llama3-70b-8192"});
        let path = log_request_to_file(
            dir.path(),
            "https://api.groq.com/openai/v1/chat/completions",
            &body,
            "meta/llama",
            "gsk_1234567890abcdef",
            "20250101-000000.000",
        )
        .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "req-20250101-000000.000-meta-llama.txt"
        );
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Authorization: Bearer gsk_123456***"));
        assert!(!content.contains("abcdef"));
        assert!(content.contains("Host: api.groq.com"));
        assert!(content.contains("Port: 443 (default)"));
        assert!(content.contains("\"model\": \"llama3-70b-8192\""));
    }

    #[test]
    fn test_response_log_pretty_prints_json() {
        let dir = TempDir::new().unwrap();
        let path = log_response_to_file(
            dir.path(),
            reqwest::StatusCode::OK,
            r#"{"choices":[]}"#,
            "vision",
            "ts",
        )
        .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Status: 200 OK"));
        assert!(content.contains("\"choices\": []"));
        assert!(content.contains("Response Size: 14 bytes"));
    }
}
