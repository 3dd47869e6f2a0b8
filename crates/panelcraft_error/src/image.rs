//! Image generation error types.

/// Image generation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ImageErrorKind {
    /// The service answered but carried no image payload
    #[display("Response contained no image data")]
    MissingPayload,
    /// The service failed to produce a panel image
    #[display("Panel image generation failed: {_0}")]
    Generation(String),
    /// The character reference image could not be produced
    #[display("Reference image generation failed: {_0}")]
    Reference(String),
    /// Returned image data could not be decoded
    #[display("Image decode error: {_0}")]
    Decode(String),
}

/// Image generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{ImageError, ImageErrorKind};
///
/// let err = ImageError::new(ImageErrorKind::MissingPayload);
/// assert!(format!("{}", err).contains("no image data"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Image Error: {} at line {} in {}", kind, line, file)]
pub struct ImageError {
    kind: ImageErrorKind,
    line: u32,
    file: &'static str,
}

impl ImageError {
    /// Create a new ImageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ImageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ImageErrorKind {
        &self.kind
    }
}
