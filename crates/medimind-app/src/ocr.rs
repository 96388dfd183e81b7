use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use medimind_chat::{MediMindError, Result, TextExtractor};

/// OCR through the `tesseract` command line tool
#[derive(Debug, Clone)]
pub struct TesseractExtractor {
    program: String,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        Self::with_program("tesseract")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for TesseractExtractor {
    async fn extract_text(&self, image: &Path) -> Result<String> {
        if !image.is_file() {
            return Err(MediMindError::Extraction(format!("{} is not a file", image.display())));
        }

        tracing::debug!(program = %self.program, image = %image.display(), "running OCR");
        let output = Command::new(&self.program)
            .arg(image)
            .arg("stdout")
            .output()
            .await
            .map_err(|e| {
                MediMindError::Extraction(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediMindError::Extraction(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_image() {
        let extractor = TesseractExtractor::new();
        let err = extractor.extract_text(Path::new("/definitely/not/here.png")).await.unwrap_err();
        assert!(matches!(err, MediMindError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("rx.png");
        std::fs::write(&image, b"png").unwrap();

        let extractor = TesseractExtractor::with_program("medimind-no-such-ocr-binary");
        let err = extractor.extract_text(&image).await.unwrap_err();
        match err {
            MediMindError::Extraction(msg) => assert!(msg.contains("failed to run")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned_trimmed() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("rx.png");
        std::fs::write(&image, b"png").unwrap();

        // echo prints its arguments, standing in for the OCR output
        let extractor = TesseractExtractor::with_program("echo");
        let text = extractor.extract_text(&image).await.unwrap();
        assert_eq!(text, format!("{} stdout", image.display()));
    }
}
