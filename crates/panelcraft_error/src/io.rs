//! Filesystem error types.

/// Filesystem error with the offending path and source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("IO Error: {} ({}) at line {} in {}", message, path, line, file)]
pub struct IoError {
    /// Error message
    pub message: String,
    /// Path being read or written
    pub path: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl IoError {
    /// Wrap a `std::io::Error` raised while touching `path`.
    #[track_caller]
    pub fn new(err: &std::io::Error, path: impl AsRef<std::path::Path>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: err.to_string(),
            path: path.as_ref().display().to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
