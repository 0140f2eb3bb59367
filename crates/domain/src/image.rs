//! Image payload — the raw JPEG bytes captured by the camera.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// JPEG start-of-image marker.
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Validated JPEG bytes.
///
/// Serialized as a standard base64 string so records stay valid JSON.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData(Vec<u8>);

impl ImageData {
    /// Validate and wrap raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyImage`] for an empty payload,
    /// [`ValidationError::ImageTooLarge`] above [`MAX_IMAGE_BYTES`], and
    /// [`ValidationError::NotJpeg`] when the SOI marker is missing.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ValidationError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ValidationError::EmptyImage);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                max: MAX_IMAGE_BYTES,
            });
        }
        if !bytes.starts_with(&JPEG_SOI) {
            return Err(ValidationError::NotJpeg);
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: construction rejects empty payloads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("len", &self.0.len())
            .finish()
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}
