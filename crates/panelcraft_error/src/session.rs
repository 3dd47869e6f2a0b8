//! Session state machine error types.

/// Session-level failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SessionErrorKind {
    /// The requested intent is not valid in the current phase
    #[display("Cannot {intent} while session is in phase {phase}")]
    InvalidTransition {
        /// Current phase name
        phase: String,
        /// Rejected intent name
        intent: String,
    },
    /// Panel count outside the supported range
    #[display("Panel count {requested} is outside the supported range {min}..={max}")]
    PanelCountOutOfRange {
        /// Requested count
        requested: u8,
        /// Smallest supported count
        min: u8,
        /// Largest supported count
        max: u8,
    },
    /// No panel with this index exists
    #[display("No panel with index {_0}")]
    UnknownPanel(usize),
    /// A panel image status change that would break the status protocol
    #[display("Panel {panel} cannot move from {from} to {to}")]
    IllegalStatusChange {
        /// 1-based panel index
        panel: usize,
        /// Current status
        from: String,
        /// Rejected status
        to: String,
    },
    /// Approval attempted before every panel was streamed
    #[display("Script incomplete: {received} of {expected} panels received")]
    ScriptIncomplete {
        /// Panels received so far
        received: usize,
        /// Panels requested
        expected: usize,
    },
    /// An image operation needs the reference image but none exists
    #[display("No reference image available for this session")]
    MissingReference,
    /// Story idea is empty
    #[display("Story idea must not be empty")]
    EmptyIdea,
    /// Unrecognized genre name
    #[display("Unknown genre: {_0}")]
    UnknownGenre(String),
    /// Playback requested with no finished panels
    #[display("No panels are ready for playback")]
    NothingToPlay,
    /// Download requested but no exporter is configured
    #[display("No exporter configured for download")]
    NoExporter,
    /// The panel image is still being rendered
    #[display("Panel {_0} image is still in flight")]
    PanelBusy(usize),
}

/// Session error with source location tracking.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{SessionError, SessionErrorKind};
///
/// let err = SessionError::new(SessionErrorKind::ScriptIncomplete {
///     received: 3,
///     expected: 5,
/// });
/// assert!(format!("{}", err).contains("3 of 5"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    kind: SessionErrorKind,
    line: u32,
    file: &'static str,
}

impl SessionError {
    /// Create a new SessionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}
