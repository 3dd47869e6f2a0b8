//! Narration device abstraction.

use async_trait::async_trait;
use panelcraft_core::VoiceHandle;
use panelcraft_error::PanelcraftResult;

/// Speaks panel captions.
///
/// Injected into the playback controller instead of reaching for ambient
/// platform audio state.
#[async_trait]
pub trait NarrationDevice: Send + Sync {
    /// Speak `text` and resolve when speech has finished.
    ///
    /// A `cancel_all` issued while speaking resolves this early with `Ok`.
    async fn speak(&self, text: &str, voice: Option<&VoiceHandle>) -> PanelcraftResult<()>;

    /// Stop all speech immediately.
    fn cancel_all(&self);

    /// Voices this device can speak with.
    fn voices(&self) -> Vec<VoiceHandle> {
        Vec::new()
    }
}
