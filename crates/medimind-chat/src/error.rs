use std::path::PathBuf;
use thiserror::Error;

use medimind_llm_api::{ImageError, RemoteError};

/// Chat log read/write failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to access chat log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a JSON array of messages
    #[error("chat log {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum MediMindError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("image is too large: {size} bytes (limit {limit} bytes)")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("failed to read image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<MediMindError>,
    },
}

impl MediMindError {
    /// Whether another `answer` attempt could succeed. Authentication
    /// failures are remote errors but will not fix themselves.
    pub fn is_retryable(&self) -> bool {
        match self {
            MediMindError::Storage(StorageError::Io { .. }) => true,
            MediMindError::Remote(remote) => !remote.is_auth(),
            _ => false,
        }
    }
}

impl From<ImageError> for MediMindError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::TooLarge { size, limit } => MediMindError::PayloadTooLarge { size, limit },
            ImageError::Read { path, source } => MediMindError::Image { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, MediMindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        let io = MediMindError::Storage(StorageError::Io {
            path: PathBuf::from("ChatLog.json"),
            source: std::io::Error::other("disk full"),
        });
        assert!(io.is_retryable());

        let unavailable = MediMindError::Remote(RemoteError::Api {
            status: 503,
            body: String::new(),
        });
        assert!(unavailable.is_retryable());

        let auth = MediMindError::Remote(RemoteError::Api { status: 401, body: String::new() });
        assert!(!auth.is_retryable());

        assert!(!MediMindError::Configuration("missing key".into()).is_retryable());
        assert!(!MediMindError::PayloadTooLarge { size: 2, limit: 1 }.is_retryable());
    }

    #[test]
    fn test_image_error_conversion() {
        let err: MediMindError = ImageError::TooLarge { size: 10, limit: 5 }.into();
        assert!(matches!(err, MediMindError::PayloadTooLarge { size: 10, limit: 5 }));
    }
}
