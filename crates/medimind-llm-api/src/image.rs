use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::Path;

use medimind_types::MAX_IMAGE_BYTES;

use crate::error::ImageError;

/// Image bytes ready to be sent to a vision model.
///
/// Construction enforces [`MAX_IMAGE_BYTES`] on the raw bytes, so a payload
/// that exists is always small enough to send.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl ImagePayload {
    pub fn from_bytes(bytes: Vec<u8>, mime: &'static str) -> Result<Self, ImageError> {
        check_size(bytes.len() as u64)?;
        Ok(Self { bytes, mime })
    }

    /// Read an image from disk. The size is checked from metadata before the
    /// file is read.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let read_err = |source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(read_err)?.len();
        check_size(size)?;

        let bytes = fs::read(path).map_err(read_err)?;
        Self::from_bytes(bytes, mime_for_path(path))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// `data:` URL with the base64-encoded image
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn check_size(size: u64) -> Result<(), ImageError> {
    if size > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// MIME type from the file extension; unknown extensions are sent as JPEG
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
