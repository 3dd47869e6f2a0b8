//! Terminal narration.

use async_trait::async_trait;
use panelcraft_core::VoiceHandle;
use panelcraft_error::PanelcraftResult;
use panelcraft_interface::NarrationDevice;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::debug;

/// Prints each caption and holds it on screen for as long as it would
/// take to read aloud.
#[derive(Debug)]
pub struct ConsoleNarrator {
    words_per_minute: u32,
    cancelled: Notify,
}

impl ConsoleNarrator {
    /// Narrator pacing captions at `words_per_minute`.
    pub fn new(words_per_minute: u32) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
            cancelled: Notify::new(),
        }
    }

    /// How long `text` stays on screen; never less than one second.
    pub fn reading_time(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count() as u64;
        let millis = words * 60_000 / u64::from(self.words_per_minute);
        Duration::from_millis(millis.max(1_000))
    }
}

#[async_trait]
impl NarrationDevice for ConsoleNarrator {
    async fn speak(&self, text: &str, voice: Option<&VoiceHandle>) -> PanelcraftResult<()> {
        let cancelled = self.cancelled.notified();
        match voice {
            Some(voice) => println!("  [{voice}] {text}"),
            None => println!("  {text}"),
        }
        tokio::select! {
            _ = tokio::time::sleep(self.reading_time(text)) => {}
            _ = cancelled => debug!("Narration cancelled"),
        }
        Ok(())
    }

    fn cancel_all(&self) {
        self.cancelled.notify_waiters();
    }

    fn voices(&self) -> Vec<VoiceHandle> {
        vec![VoiceHandle::from("narrator")]
    }
}
