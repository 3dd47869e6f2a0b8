//! HTTP error types.

/// HTTP failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// Request could not be sent or the connection dropped
    #[display("Request failed: {_0}")]
    Request(String),
    /// Server answered with a non-success status
    #[display("HTTP {status_code} error: {message}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Response body could not be decoded
    #[display("Failed to decode response: {_0}")]
    Decode(String),
    /// Request exceeded the transport timeout
    #[display("Request timed out")]
    Timeout,
}

impl HttpErrorKind {
    /// Whether a repeat of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            HttpErrorKind::Status { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            HttpErrorKind::Request(_) | HttpErrorKind::Timeout => true,
            HttpErrorKind::Decode(_) => false,
        }
    }
}

/// HTTP error with source location tracking.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{HttpError, HttpErrorKind};
///
/// let err = HttpError::new(HttpErrorKind::Status {
///     status_code: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(err.kind().is_transient());
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", kind, line, file)]
pub struct HttpError {
    kind: HttpErrorKind,
    line: u32,
    file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: HttpErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for HttpError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::new(HttpErrorKind::Timeout)
        } else if err.is_decode() {
            HttpError::new(HttpErrorKind::Decode(err.to_string()))
        } else if let Some(status) = err.status() {
            HttpError::new(HttpErrorKind::Status {
                status_code: status.as_u16(),
                message: err.to_string(),
            })
        } else {
            HttpError::new(HttpErrorKind::Request(err.to_string()))
        }
    }
}
