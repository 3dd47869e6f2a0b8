//! Error types for the Panelcraft library.
//!
//! Each domain (script streaming, image generation, session state, HTTP,
//! configuration) has its own error struct carrying a kind and the source
//! location where it was raised. [`PanelcraftError`] unifies them for
//! callers that cross domain boundaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod http;
mod image;
mod io;
mod json;
mod retry;
mod script;
mod session;

pub use config::ConfigError;
pub use http::{HttpError, HttpErrorKind};
pub use image::{ImageError, ImageErrorKind};
pub use io::IoError;
pub use json::JsonError;
pub use retry::RetryableError;
pub use script::{ScriptError, ScriptErrorKind};
pub use session::{SessionError, SessionErrorKind};

/// Crate-level error variants.
#[derive(Debug, Clone, derive_more::From, derive_more::Display)]
pub enum PanelcraftErrorKind {
    /// HTTP transport or status error
    #[display("{_0}")]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[display("{_0}")]
    Json(JsonError),
    /// Configuration error
    #[display("{_0}")]
    Config(ConfigError),
    /// Filesystem error
    #[display("{_0}")]
    Io(IoError),
    /// Script streaming or revision error
    #[display("{_0}")]
    Script(ScriptError),
    /// Image generation error
    #[display("{_0}")]
    Image(ImageError),
    /// Session state machine error
    #[display("{_0}")]
    Session(SessionError),
}

/// Panelcraft error with kind discrimination.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{PanelcraftError, PanelcraftErrorKind, SessionError, SessionErrorKind};
///
/// let err: PanelcraftError = SessionError::new(SessionErrorKind::UnknownPanel(7)).into();
/// assert!(matches!(err.kind(), PanelcraftErrorKind::Session(_)));
/// assert!(err.to_string().contains("7"));
/// ```
#[derive(Debug, Clone)]
pub struct PanelcraftError(Box<PanelcraftErrorKind>);

impl PanelcraftError {
    /// Create a new error from a kind.
    pub fn new(kind: PanelcraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PanelcraftErrorKind {
        &self.0
    }
}

impl std::fmt::Display for PanelcraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Panelcraft Error: {}", self.0)
    }
}

impl std::error::Error for PanelcraftError {}

impl<T> From<T> for PanelcraftError
where
    T: Into<PanelcraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Panelcraft operations.
pub type PanelcraftResult<T> = std::result::Result<T, PanelcraftError>;
