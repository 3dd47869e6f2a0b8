//! Display layer abstraction.

use panelcraft_core::{Genre, Panel, SessionPhase, VoiceHandle};
use serde::Serialize;

/// Immutable copy of session state handed to the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Incarnation counter; changes whenever the panel set is discarded
    pub epoch: u64,
    /// Current phase
    pub phase: SessionPhase,
    /// Story idea, empty when idle
    pub idea: String,
    /// Genre of the session
    pub genre: Genre,
    /// Requested panel count
    pub panel_count: usize,
    /// Panels received so far, in index order
    pub panels: Vec<Panel>,
    /// Selected narration voice
    pub voice: Option<VoiceHandle>,
    /// Last session-level error message
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Whether every requested panel has been scripted.
    pub fn script_complete(&self) -> bool {
        self.panel_count > 0 && self.panels.len() == self.panel_count
    }
}

/// Receives the session state after every mutation.
pub trait SessionObserver: Send + Sync {
    /// Render the latest state.
    fn render(&self, snapshot: &SessionSnapshot);
}

/// Observer that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn render(&self, _snapshot: &SessionSnapshot) {}
}
