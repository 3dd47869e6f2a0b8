//! User intents relayed by the display layer.

use panelcraft_core::{ImageStatus, PanelEdit, PanelScript, StoryRequest, VoiceHandle};
use panelcraft_images::GenerationSummary;
use panelcraft_interface::ExportReport;
use std::path::PathBuf;

/// A command from the display layer.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Start a comic from a story request
    Generate(StoryRequest),
    /// Discard the panels and stream the script again
    RegenerateScript,
    /// Accept the script and render every panel
    Approve,
    /// Change one panel's script fields by hand
    EditPanel {
        /// 1-based panel index
        index: usize,
        /// Fields to change
        edit: PanelEdit,
    },
    /// Ask the script service for a new version of one panel
    RevisePanel(usize),
    /// Render one panel image again
    RegenerateImage(usize),
    /// Discard the session
    StartOver,
    /// Save every ready panel and the script under a directory
    DownloadAll(PathBuf),
    /// Start or resume the narrated slideshow
    Play,
    /// Pause the slideshow
    Pause,
    /// Jump the slideshow to a panel
    Seek(usize),
    /// Advance the slideshow by one panel
    Next,
    /// Choose the narration voice
    SelectVoice(Option<VoiceHandle>),
}

/// Result of handling an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The intent was applied; observe the session for its effect
    Applied,
    /// Bulk image generation settled
    Generated(GenerationSummary),
    /// A panel received a revised script
    Revised(PanelScript),
    /// A panel image was rendered again
    Regenerated(ImageStatus),
    /// The comic was written to disk
    Exported(ExportReport),
}
