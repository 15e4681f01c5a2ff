//! Selfie upload payloads and batch-size rules.
//!
//! Browsers send images as base64 data URLs
//! (`data:image/jpeg;base64,/9j/4AAQ...`). This module converts between
//! that representation and raw bytes and enforces the minimum batch sizes
//! for uploads and training sets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CoreError;

/// Minimum number of images in a multi-image upload.
pub const MIN_UPLOAD_IMAGES: usize = 3;

/// Minimum number of images needed to train a tune.
pub const MIN_TRAINING_IMAGES: usize = 10;

/// Content type assumed when a payload carries no data-URL header.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A decoded upload ready to be forwarded as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension matching the mime type, used for the multipart file name.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/heic" => "heic",
            _ => "jpg",
        }
    }
}

/// Decode a base64 data URL into its mime type and bytes.
///
/// A bare base64 string without the `data:` header is accepted and treated
/// as [`DEFAULT_IMAGE_MIME`].
pub fn decode_data_url(input: &str) -> Result<DecodedImage, CoreError> {
    let input = input.trim();
    let (mime_type, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| CoreError::Validation("Malformed data URL".into()))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| CoreError::Validation("Data URL is not base64 encoded".into()))?;
            let mime = if mime.is_empty() {
                DEFAULT_IMAGE_MIME
            } else {
                mime
            };
            (mime.to_string(), payload)
        }
        None => (DEFAULT_IMAGE_MIME.to_string(), input),
    };

    if payload.is_empty() {
        return Err(CoreError::Validation("Image payload is empty".into()));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))?;

    Ok(DecodedImage { mime_type, bytes })
}

/// Encode raw bytes as a base64 data URL.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Reject multi-image uploads smaller than [`MIN_UPLOAD_IMAGES`].
pub fn validate_upload_batch(count: usize) -> Result<(), CoreError> {
    if count < MIN_UPLOAD_IMAGES {
        return Err(CoreError::Validation(format!(
            "Please upload at least {MIN_UPLOAD_IMAGES} images"
        )));
    }
    Ok(())
}

/// Reject training sets smaller than [`MIN_TRAINING_IMAGES`].
pub fn validate_training_set(count: usize) -> Result<(), CoreError> {
    if count < MIN_TRAINING_IMAGES {
        return Err(CoreError::Validation(format!(
            "Please upload at least {MIN_TRAINING_IMAGES} images for training"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_preserves_byte_length() {
        let original: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
        let url = encode_data_url("image/png", &original);
        let decoded = decode_data_url(&url).unwrap();

        assert_eq!(decoded.bytes.len(), original.len());
        assert_eq!(decoded.bytes, original);
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.extension(), "png");
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let decoded = decode_data_url("aGVsbG8=").unwrap();
        assert_eq!(decoded.bytes, b"hello");
        assert_eq!(decoded.mime_type, DEFAULT_IMAGE_MIME);
        assert_eq!(decoded.extension(), "jpg");
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png,aGVsbG8=").is_err());
        assert!(decode_data_url("data:image/png;base64,").is_err());
        assert!(decode_data_url("data:image/png;base64,***").is_err());
    }

    #[test]
    fn upload_batch_needs_three() {
        let err = validate_upload_batch(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Please upload at least 3 images"
        );
        assert!(validate_upload_batch(3).is_ok());
    }

    #[test]
    fn training_set_needs_ten() {
        let err = validate_training_set(9).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: Please upload at least 10 images for training"
        );
        assert!(validate_training_set(10).is_ok());
    }
}
