use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the completion endpoint. None of these are retried here.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx status, including authentication failures
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed stream payload: {0}")]
    MalformedStream(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl RemoteError {
    /// True for 401/403 responses
    pub fn is_auth(&self) -> bool {
        matches!(self, RemoteError::Api { status: 401 | 403, .. })
    }
}

/// Failures preparing an image for a vision request
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("failed to read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
