//! Script streaming and revision error types.

/// Specific error conditions for script operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScriptErrorKind {
    /// The fragment source failed mid-stream
    #[display("Script stream interrupted: {_0}")]
    StreamInterrupted(String),
    /// The stream ended but the accumulated text never formed a complete array
    #[display("Script stream ended without a complete panel array ({parsed} panels recovered): {message}")]
    Unterminated {
        /// Panels recovered by the repair parse before the stream ended
        parsed: usize,
        /// Parser message for the final strict parse
        message: String,
    },
    /// The script generator rejected the request
    #[display("Script generation failed: {_0}")]
    Generation(String),
    /// A single-panel revision failed
    #[display("Revision of panel {panel} failed: {message}")]
    Revision {
        /// 1-based panel index
        panel: usize,
        /// Underlying failure
        message: String,
    },
    /// A response could not be interpreted as a panel script
    #[display("Malformed panel script: {_0}")]
    Malformed(String),
}

/// Error type for script operations.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::Revision {
///     panel: 3,
///     message: "timeout".to_string(),
/// });
/// assert!(format!("{}", err).contains("panel 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    kind: ScriptErrorKind,
    line: u32,
    file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ScriptErrorKind {
        &self.kind
    }
}
