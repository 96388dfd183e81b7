use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// Image-to-text extraction (OCR) used for prescription photos
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &Path) -> Result<String>;
}
