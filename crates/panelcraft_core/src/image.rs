//! Opaque image handles.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reference to a rendered image.
///
/// Inline bytes are shared behind an `Arc` so the reference image can be
/// handed to every concurrent panel request without copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageRef {
    /// Raw image bytes with their MIME type
    Binary {
        /// Encoded image data
        data: Arc<Vec<u8>>,
        /// MIME type, e.g. `image/png`
        mime_type: String,
    },
    /// Remote image location
    Url(String),
}

impl ImageRef {
    /// Wrap raw bytes.
    pub fn binary(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        ImageRef::Binary {
            data: Arc::new(data),
            mime_type: mime_type.into(),
        }
    }

    /// Point at a remote image.
    pub fn url(url: impl Into<String>) -> Self {
        ImageRef::Url(url.into())
    }

    /// File extension matching the image format, defaulting to `png`.
    pub fn extension(&self) -> &'static str {
        let hint = match self {
            ImageRef::Binary { mime_type, .. } => mime_type.as_str(),
            ImageRef::Url(url) => url.rsplit('.').next().unwrap_or_default(),
        };
        match hint {
            "image/jpeg" | "jpg" | "jpeg" => "jpg",
            "image/webp" | "webp" => "webp",
            "image/gif" | "gif" => "gif",
            _ => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_follows_mime_type_and_url_suffix() {
        assert_eq!(ImageRef::binary(vec![1, 2], "image/jpeg").extension(), "jpg");
        assert_eq!(ImageRef::binary(vec![], "application/octet-stream").extension(), "png");
        assert_eq!(ImageRef::url("https://cdn.example/p/1.webp").extension(), "webp");
        assert_eq!(ImageRef::url("https://picsum.photos/seed/abc/768/512").extension(), "png");
    }

    #[test]
    fn clones_share_binary_payload() {
        let image = ImageRef::binary(vec![0u8; 1024], "image/png");
        let copy = image.clone();
        match (&image, &copy) {
            (ImageRef::Binary { data: a, .. }, ImageRef::Binary { data: b, .. }) => {
                assert!(Arc::ptr_eq(a, b));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn binary_payload_survives_json() {
        let image = ImageRef::binary(vec![137, 80, 78, 71], "image/png");
        let json = serde_json::to_string(&image).unwrap();
        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
