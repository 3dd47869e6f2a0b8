//! Session phases.

use serde::{Deserialize, Serialize};

/// Phase of a comic session.
///
/// ```text
/// Idle -> ScriptStreaming -> ScriptReview -> ImageGenerating -> Completed
///              ^                  |
///              +------------------+   (regenerate full script)
/// any -> Idle                          (start over)
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
pub enum SessionPhase {
    /// No session in progress
    #[default]
    Idle,
    /// Script requested, stream not yet open
    ScriptStreaming,
    /// Script visible for review; panels may still be arriving
    ScriptReview,
    /// Bulk image generation in progress
    ImageGenerating,
    /// Bulk image generation settled
    Completed,
}

impl SessionPhase {
    /// Whether panel images exist or are being produced in this phase.
    pub fn has_images(&self) -> bool {
        matches!(self, SessionPhase::ImageGenerating | SessionPhase::Completed)
    }
}
