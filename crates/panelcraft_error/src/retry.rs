//! Transient failure classification.

use crate::{HttpError, ImageError, PanelcraftError, PanelcraftErrorKind};

/// Marks errors that a repeat of the same request could plausibly clear.
///
/// The panel image pipeline retries every failure once regardless; this
/// classification feeds its logs and the provider clients' diagnostics.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{HttpError, HttpErrorKind, RetryableError};
///
/// let busy = HttpError::new(HttpErrorKind::Status {
///     status_code: 429,
///     message: "slow down".to_string(),
/// });
/// assert!(busy.is_retryable());
///
/// let denied = HttpError::new(HttpErrorKind::Status {
///     status_code: 401,
///     message: "bad key".to_string(),
/// });
/// assert!(!denied.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        self.kind().is_transient()
    }
}

impl RetryableError for ImageError {
    // Every image failure, including a missing payload, is transient.
    fn is_retryable(&self) -> bool {
        true
    }
}

impl RetryableError for PanelcraftError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            PanelcraftErrorKind::Http(e) => e.is_retryable(),
            PanelcraftErrorKind::Image(e) => e.is_retryable(),
            _ => false,
        }
    }
}
